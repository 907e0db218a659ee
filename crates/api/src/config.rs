//! Application configuration

use std::env;
use std::path::PathBuf;

/// Default number of posts sent to a client when it connects
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 100;

/// Which post store the server runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub public_dir: PathBuf,
    pub log_format: LogFormat,

    // Store
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // Board behavior
    /// `None` sends every post on connect
    pub snapshot_limit: Option<usize>,
    pub require_title: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            _ => return Err(ConfigError::Invalid("STORE_BACKEND")),
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        Ok(Self {
            // Server
            bind_address: format!("{host}:{port}"),
            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },

            // Store
            store_backend,
            database_url,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            // Board behavior
            snapshot_limit: match env::var("SNAPSHOT_LIMIT") {
                Ok(raw) => match raw.trim().parse::<usize>() {
                    Ok(0) => None,
                    Ok(limit) => Some(limit),
                    Err(_) => return Err(ConfigError::Invalid("SNAPSHOT_LIMIT")),
                },
                Err(_) => Some(DEFAULT_SNAPSHOT_LIMIT),
            },
            require_title: env::var("REQUIRE_TITLE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }

    /// Configuration for an in-memory board, used by tests and local runs
    pub fn in_memory() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            public_dir: PathBuf::from("public"),
            log_format: LogFormat::Pretty,
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 5,
            snapshot_limit: Some(DEFAULT_SNAPSHOT_LIMIT),
            require_title: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
