//! Docker-based SFTP test fixtures

use std::path::PathBuf;
use std::process::Command;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use secrecy::SecretString;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep, timeout};

use ferry::config::Credentials;
use ferry::sftp::SftpSession;

// Ensure Docker containers are started only once per test run
static DOCKER_INIT: Once = Once::new();
static DOCKER_AVAILABLE: AtomicBool = AtomicBool::new(false);

// Tests share one server; serialize them so uploads don't interleave
static TEST_LOCK: Mutex<()> = Mutex::const_new(());

pub async fn acquire_test_lock() -> MutexGuard<'static, ()> {
    TEST_LOCK.lock().await
}

/// Configuration for the test SFTP server
#[derive(Debug, Clone)]
pub struct TestSftpServer {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for TestSftpServer {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2223,
            username: "testuser".to_string(),
            password: "testpass123".to_string(),
        }
    }
}

/// Start Docker containers for SFTP testing
pub fn ensure_docker_started() {
    DOCKER_INIT.call_once(|| {
        let docker_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/docker");

        // Check if Docker is available
        let docker_check = Command::new("docker").arg("--version").output();

        if docker_check.is_err() {
            eprintln!("WARNING: Docker not available, SFTP integration tests will be skipped");
            return;
        }

        // Check if docker-compose or docker compose is available
        let compose_cmd = if Command::new("docker-compose")
            .arg("--version")
            .output()
            .is_ok()
        {
            "docker-compose"
        } else if Command::new("docker")
            .args(["compose", "version"])
            .output()
            .is_ok()
        {
            "docker"
        } else {
            eprintln!("WARNING: docker-compose not available");
            return;
        };

        // Start the container
        let status = if compose_cmd == "docker" {
            Command::new("docker")
                .current_dir(&docker_dir)
                .args(["compose", "up", "-d", "--wait"])
                .status()
        } else {
            Command::new(compose_cmd)
                .current_dir(&docker_dir)
                .args(["up", "-d", "--wait"])
                .status()
        };

        match status {
            Ok(s) if s.success() => {
                DOCKER_AVAILABLE.store(true, Ordering::SeqCst);
                eprintln!("SFTP test container started successfully");
            }
            Ok(s) => {
                eprintln!(
                    "Failed to start SFTP test container: exit code {:?}",
                    s.code()
                );
            }
            Err(e) => {
                eprintln!("Failed to start SFTP test container: {}", e);
            }
        }
    });
}

/// Check if Docker containers are running
pub fn is_docker_available() -> bool {
    ensure_docker_started();
    DOCKER_AVAILABLE.load(Ordering::SeqCst)
}

/// Wait for the SFTP server to accept TCP connections
pub async fn wait_for_sftp_ready(host: &str, port: u16) -> Result<(), String> {
    let addr = format!("{}:{}", host, port);
    let max_attempts = 30;

    for attempt in 1..=max_attempts {
        match timeout(Duration::from_secs(2), TcpStream::connect(&addr)).await {
            Ok(Ok(_)) => return Ok(()),
            _ => {
                if attempt == max_attempts {
                    return Err(format!(
                        "SFTP server not ready after {} attempts",
                        max_attempts
                    ));
                }
                sleep(Duration::from_millis(200)).await;
            }
        }
    }

    Err("SFTP server not ready".to_string())
}

/// Test environment backed by the Docker SFTP server
pub struct SftpTestEnvironment {
    pub server: TestSftpServer,
}

impl SftpTestEnvironment {
    pub async fn new() -> Result<Self, String> {
        if !is_docker_available() {
            return Err("Docker not available".to_string());
        }

        let server = TestSftpServer::default();
        wait_for_sftp_ready(&server.host, server.port).await?;

        Ok(Self { server })
    }

    /// Credentials for the test server
    pub fn credentials(&self) -> Credentials {
        Credentials {
            host: self.server.host.clone(),
            port: self.server.port,
            username: self.server.username.clone(),
            password: SecretString::from(self.server.password.clone()),
        }
    }

    /// Credentials with a wrong password, for auth failure tests
    pub fn bad_credentials(&self) -> Credentials {
        Credentials {
            password: SecretString::from("wrong-password"),
            ..self.credentials()
        }
    }

    /// Create a disconnected session against the test server
    pub fn create_session(&self) -> SftpSession {
        SftpSession::new(self.credentials()).with_connect_timeout(Duration::from_secs(10))
    }
}

/// Macro to skip tests when Docker is not available
#[macro_export]
macro_rules! skip_if_no_docker {
    () => {
        if !super::fixtures::is_docker_available() {
            eprintln!("Skipping test: Docker not available");
            return;
        }
    };
}
