use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "ferry", "ferry").map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Get the path to the config file
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("ferry.toml"))
}

/// Get the log directory path
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "ferry", "ferry")
        .map(|proj_dirs| proj_dirs.data_dir().join("logs"))
}

/// Ensure the log directory exists, returning its path
pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = log_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine log directory",
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}
