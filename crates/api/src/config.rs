use std::str::FromStr;

use biogrid_core::grid::{GridMetrics, DEFAULT_CELL_SIZE, DEFAULT_GAP, DEFAULT_HANDLE_SIZE};

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid grid metrics: {0}")]
    Grid(#[from] biogrid_core::error::CoreError),
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT` (`text` or `json`, default `text`). Unknown values
    /// fall back to text since logging is set up before configuration.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Pixel geometry used by the render endpoint.
    pub grid: GridMetrics,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `GRID_CELL_SIZE`       | `120`                      |
    /// | `GRID_GAP`             | `16`                       |
    /// | `GRID_HANDLE_SIZE`     | `16`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_var("PORT", 3000)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", 30)?;

        let grid = GridMetrics::new(
            parse_var("GRID_CELL_SIZE", DEFAULT_CELL_SIZE)?,
            parse_var("GRID_GAP", DEFAULT_GAP)?,
            parse_var("GRID_HANDLE_SIZE", DEFAULT_HANDLE_SIZE)?,
        )?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            grid,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
