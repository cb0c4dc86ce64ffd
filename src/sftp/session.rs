//! SFTP session lifecycle and file operations

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use russh::client::{self, Config};
use russh::Disconnect;
use russh_sftp::client::SftpSession as RusshSftpSession;
use russh_sftp::protocol::OpenFlags;
use secrecy::ExposeSecret;
use tokio::io::{self, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::error::SftpError;
use crate::security_log;

use super::handler::ClientHandler;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection state. The SFTP channel exists exactly when the session is
/// connected; there is no flag to keep in sync with it.
enum State {
    Disconnected,
    Connected {
        handle: client::Handle<ClientHandler>,
        sftp: RusshSftpSession,
    },
}

/// One outbound SFTP session.
///
/// Holds the credentials for a single remote host and cycles between
/// disconnected and connected across its lifetime. State transitions take
/// `&mut self`, so two operations cannot race on the same session.
pub struct SftpSession {
    credentials: Credentials,
    config: Arc<Config>,
    connect_timeout: Duration,
    state: State,
}

impl std::fmt::Debug for SftpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpSession")
            .field("host", &self.credentials.host)
            .field("port", &self.credentials.port)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl SftpSession {
    /// Create a new, disconnected session for the given credentials
    pub fn new(credentials: Credentials) -> Self {
        let config = Config {
            inactivity_timeout: Some(Duration::from_secs(3600)),
            keepalive_interval: Some(Duration::from_secs(60)),
            keepalive_max: 3,
            ..Default::default()
        };

        Self {
            credentials,
            config: Arc::new(config),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            state: State::Disconnected,
        }
    }

    /// Override the connection timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Whether the session currently holds an SFTP channel
    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected { .. })
    }

    /// Establish the session: TCP connect, SSH handshake, password
    /// authentication, then the SFTP subsystem channel.
    ///
    /// One attempt only; on failure the error is surfaced and the session
    /// stays disconnected. Calling this on an already connected session
    /// fails with [`SftpError::AlreadyConnected`].
    pub async fn connect(&mut self) -> Result<(), SftpError> {
        if self.is_connected() {
            return Err(SftpError::AlreadyConnected);
        }

        let addr = self.credentials.address();
        info!("Connecting to {}", addr);

        let stream = timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| SftpError::Connection(format!("Connection timed out to {}", addr)))?
            .map_err(|e| SftpError::Connection(format!("Failed to connect to {}: {}", addr, e)))?;

        // Wrap the rest of the connection process in a timeout
        let (handle, sftp) = match timeout(self.connect_timeout, self.establish(stream)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SftpError::Connection(format!(
                    "SFTP session setup timed out for {}",
                    addr
                )));
            }
        };

        security_log::log_sftp_connect(
            &self.credentials.host,
            self.credentials.port,
            &self.credentials.username,
        );

        self.state = State::Connected { handle, sftp };
        Ok(())
    }

    /// Internal helper to establish the SFTP session after TCP connection
    async fn establish(
        &self,
        stream: TcpStream,
    ) -> Result<(client::Handle<ClientHandler>, RusshSftpSession), SftpError> {
        let handler = ClientHandler::new(self.credentials.host.clone(), self.credentials.port);

        let mut handle = client::connect_stream(self.config.clone(), stream, handler)
            .await
            .map_err(|e| {
                SftpError::Connection(format!(
                    "SSH handshake failed for {}: {}",
                    self.credentials.address(),
                    e
                ))
            })?;

        self.authenticate(&mut handle).await?;

        // Open channel and request SFTP subsystem
        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| SftpError::Connection(format!("Failed to open channel: {}", e)))?;

        channel
            .request_subsystem(false, "sftp")
            .await
            .map_err(|e| {
                SftpError::Connection(format!("Failed to request SFTP subsystem: {}", e))
            })?;

        let sftp = RusshSftpSession::new(channel.into_stream())
            .await
            .map_err(|e| {
                SftpError::Connection(format!("Failed to initialize SFTP session: {}", e))
            })?;

        Ok((handle, sftp))
    }

    async fn authenticate(
        &self,
        handle: &mut client::Handle<ClientHandler>,
    ) -> Result<(), SftpError> {
        let host = &self.credentials.host;
        let port = self.credentials.port;
        let username = &self.credentials.username;

        security_log::log_auth_attempt(host, port, username);

        // Expose the secret only at the point of authentication
        let auth_result = match handle
            .authenticate_password(username, self.credentials.password.expose_secret())
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let reason = format!("Password auth failed: {}", e);
                security_log::log_auth_failure(host, port, username, &reason);
                return Err(SftpError::Connection(reason));
            }
        };

        if !auth_result.success() {
            let reason = "Authentication rejected by server";
            security_log::log_auth_failure(host, port, username, reason);
            return Err(SftpError::Connection(reason.to_string()));
        }

        security_log::log_auth_success(host, port, username);
        Ok(())
    }

    /// Close the session if connected. Idempotent: calling this on a
    /// disconnected session is a no-op, and close failures are logged rather
    /// than surfaced.
    pub async fn disconnect(&mut self) {
        match std::mem::replace(&mut self.state, State::Disconnected) {
            State::Disconnected => {}
            State::Connected { handle, sftp } => {
                // Dropping the SFTP handle closes its channel; then tear down
                // the underlying connection.
                drop(sftp);
                if let Err(e) = handle
                    .disconnect(Disconnect::ByApplication, "closing session", "en")
                    .await
                {
                    warn!("SSH disconnect failed: {}", e);
                }

                security_log::log_sftp_disconnect(
                    &self.credentials.host,
                    self.credentials.port,
                    &self.credentials.username,
                );
            }
        }
    }

    /// Borrow the SFTP channel, or fail when disconnected
    fn sftp(&self) -> Result<&RusshSftpSession, SftpError> {
        match &self.state {
            State::Connected { sftp, .. } => Ok(sftp),
            State::Disconnected => Err(SftpError::NotConnected),
        }
    }

    /// List the names of the immediate children of a remote directory, in
    /// the order the server returns them. `.` and `..` are filtered out.
    pub async fn list_dir(&self, remote_dir: &str) -> Result<Vec<String>, SftpError> {
        let sftp = self.sftp()?;
        debug!("Listing directory: {}", remote_dir);

        let read_dir = sftp.read_dir(remote_dir).await.map_err(|e| {
            SftpError::FileOperation(format!("Failed to read directory {}: {}", remote_dir, e))
        })?;

        let names = read_dir
            .map(|entry| entry.file_name())
            .filter(|name| name != "." && name != "..")
            .collect();

        Ok(names)
    }

    /// Upload a local file to a remote path, streaming until local EOF.
    /// The remote file is created, or truncated if it exists. Returns the
    /// number of bytes written.
    pub async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<u64, SftpError> {
        let sftp = self.sftp()?;

        let mut local = tokio::fs::File::open(local_path).await.map_err(|e| {
            SftpError::LocalIo(format!(
                "Failed to read local file {}: {}",
                local_path.display(),
                e
            ))
        })?;

        let mut remote = sftp
            .open_with_flags(
                remote_path,
                OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
            )
            .await
            .map_err(|e| {
                SftpError::Transfer(format!("Failed to open remote file {}: {}", remote_path, e))
            })?;

        let bytes = io::copy(&mut local, &mut remote).await.map_err(|e| {
            SftpError::Transfer(format!(
                "Failed to upload {} to {}: {}",
                local_path.display(),
                remote_path,
                e
            ))
        })?;

        // Ensure data is flushed and the remote handle is closed
        remote.shutdown().await.map_err(|e| {
            SftpError::Transfer(format!("Failed to close remote file {}: {}", remote_path, e))
        })?;

        info!(
            "Uploaded {} to {} ({} bytes)",
            local_path.display(),
            remote_path,
            bytes
        );
        Ok(bytes)
    }

    /// Download a remote file to a local path, streaming until remote EOF.
    /// Returns the number of bytes written.
    pub async fn download(&self, remote_path: &str, local_path: &Path) -> Result<u64, SftpError> {
        let sftp = self.sftp()?;

        let mut remote = sftp.open(remote_path).await.map_err(|e| {
            SftpError::Transfer(format!("Failed to open remote file {}: {}", remote_path, e))
        })?;

        let mut local = tokio::fs::File::create(local_path).await.map_err(|e| {
            SftpError::LocalIo(format!(
                "Failed to write local file {}: {}",
                local_path.display(),
                e
            ))
        })?;

        let bytes = io::copy(&mut remote, &mut local).await.map_err(|e| {
            SftpError::Transfer(format!(
                "Failed to download {} to {}: {}",
                remote_path,
                local_path.display(),
                e
            ))
        })?;

        info!(
            "Downloaded {} to {} ({} bytes)",
            remote_path,
            local_path.display(),
            bytes
        );
        Ok(bytes)
    }
}
