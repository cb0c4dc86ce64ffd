//! SFTP session module for Ferry
//!
//! Provides one-session SFTP connect, list and transfer capabilities.

pub mod handler;
pub mod session;

pub use session::SftpSession;
