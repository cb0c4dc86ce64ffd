use std::path::Path;
use std::process::ExitCode;

use ferry::config::Config;
use ferry::error::{ConfigError, SftpError};
use ferry::sftp::SftpSession;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging with file output.
    let log_dir = ferry::config::paths::ensure_log_dir().ok();
    let _guard = ferry::logging::init_logging(log_dir);

    tracing::info!("Starting Ferry SFTP client");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = SftpSession::new(config.connection.clone());
    let result = run(&mut session, &config).await;

    // Always release the connection, even after a failed step
    session.disconnect().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Transfer aborted: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load config from the path given as the sole optional argument, or from
/// the default location (built-in defaults when no file exists there).
fn load_config() -> Result<Config, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => Config::load_from(Path::new(&path)),
        None => Config::load(),
    }
}

/// The sequential transfer scenario: connect, list, upload, list again.
/// First failure aborts the remaining steps.
async fn run(session: &mut SftpSession, config: &Config) -> Result<(), SftpError> {
    let transfer = &config.transfer;

    session.connect().await?;

    let names = session.list_dir(&transfer.remote_dir).await?;
    print_listing(&transfer.remote_dir, &names);

    session
        .upload(&transfer.local_file, &transfer.remote_path)
        .await?;

    let names = session.list_dir(&transfer.remote_dir).await?;
    print_listing(&transfer.remote_dir, &names);

    Ok(())
}

fn print_listing(dir: &str, names: &[String]) {
    println!("{}:", dir);
    for name in names {
        println!("  {}", name);
    }
}
