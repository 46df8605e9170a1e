//! Configuration management for the co-authors service.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Every accessor falls back to a default
//! so the service can start without any configuration at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, io::ErrorKind, path::PathBuf};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_NAMESPACE: &str = "coauthors/v1";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `coauthors` directory under the platform-specific local data
/// directory when it is missing. A missing `.env` file is not an error;
/// variables already present in the process environment are never overridden.
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/coauthors/.env`
/// - macOS: `~/Library/Application Support/coauthors/.env`
/// - Windows: `%LOCALAPPDATA%/coauthors/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

/// Directory holding the `.env` file and the default directory snapshot.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("coauthors");
    path
}

/// Address the HTTP server binds to, from `SERVER_ADDRESS`.
///
/// # Example
///
/// ```
/// let addr = server_addr(); // e.g., "127.0.0.1:8080"
/// ```
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Versioned route namespace, from `COAUTHORS_NAMESPACE`.
///
/// Leading and trailing slashes are trimmed so the value can be joined
/// directly into route paths.
pub fn namespace() -> String {
    let raw = env::var("COAUTHORS_NAMESPACE").unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_NAMESPACE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Path of the JSON directory snapshot, from `COAUTHORS_DATA_FILE`.
///
/// Defaults to `directory.json` inside [`data_dir`].
pub fn data_file() -> PathBuf {
    env::var("COAUTHORS_DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join("directory.json"))
}
