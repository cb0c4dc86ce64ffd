//! Security event logging for audit trails.
//!
//! Provides structured logging functions for security-relevant events such as
//! authentication attempts and connection establishment.
//!
//! All security events are logged with `target: "security"` to allow filtering
//! in production environments.

use tracing::{info, warn};

/// Log an SSH authentication attempt.
///
/// Called before attempting to authenticate with a remote host.
pub fn log_auth_attempt(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "auth_attempt",
        host = %host,
        port = port,
        username = %username,
        method = "password",
        "SSH authentication attempt"
    );
}

/// Log a successful SSH authentication.
pub fn log_auth_success(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "auth_success",
        host = %host,
        port = port,
        username = %username,
        method = "password",
        "SSH authentication succeeded"
    );
}

/// Log a failed SSH authentication attempt.
pub fn log_auth_failure(host: &str, port: u16, username: &str, reason: &str) {
    warn!(
        target: "security",
        event = "auth_failure",
        host = %host,
        port = port,
        username = %username,
        method = "password",
        reason = %reason,
        "SSH authentication failed"
    );
}

/// Log an SFTP connection establishment.
pub fn log_sftp_connect(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "sftp_connect",
        host = %host,
        port = port,
        username = %username,
        "SFTP connection established"
    );
}

/// Log an SFTP connection teardown.
pub fn log_sftp_disconnect(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "sftp_disconnect",
        host = %host,
        port = port,
        username = %username,
        "SFTP connection closed"
    );
}
