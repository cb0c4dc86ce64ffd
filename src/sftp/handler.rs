use russh::ChannelId;
use russh::client::{Handler, Session};
use russh::keys::{HashAlg, PublicKey};

use crate::error::SftpError;

/// SSH client handler implementation.
///
/// Host key policy is delegated to the operator: the key is logged and
/// accepted. Verification against a known-hosts store is out of scope for
/// this client.
pub struct ClientHandler {
    host: String,
    port: u16,
}

impl ClientHandler {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }
}

impl Handler for ClientHandler {
    type Error = SftpError;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        tracing::debug!(
            "Host key for {}:{} is {}",
            self.host,
            self.port,
            server_public_key.fingerprint(HashAlg::Sha256)
        );
        Ok(true)
    }

    async fn channel_eof(
        &mut self,
        _channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn channel_close(
        &mut self,
        _channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}
