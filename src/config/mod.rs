//! Configuration module for the SkinVault backend.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults. The database path is deliberately optional: its absence is a
//! first-class runtime mode in which all persistence routes through the
//! local file store.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file. None selects fallback mode.
    pub database_path: Option<PathBuf>,
    /// Directory for the local file store (fallback backend and resilience cache)
    pub data_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_path = env::var("SKINVAULT_DATABASE_PATH").ok().map(PathBuf::from);

        let data_dir = env::var("SKINVAULT_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let bind_addr = env::var("SKINVAULT_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid SKINVAULT_BIND_ADDR format");

        let log_level = env::var("SKINVAULT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            database_path,
            data_dir,
            bind_addr,
            log_level,
        }
    }
}
