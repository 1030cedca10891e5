use std::str::FromStr;

use axum::http::HeaderValue;
use inventory_core::session::{DEFAULT_SESSION_TTL_HOURS, MAX_SESSION_TTL_HOURS};

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// PostgreSQL connection string. Only the database subcommands need it.
    pub database_url: Option<String>,
    /// Pool size (default: `10`).
    pub database_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Lifetime of a login session in hours (default: `24`).
    pub session_ttl_hours: i64,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `8080`                     |
    /// | `DATABASE_URL`             | --                         |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                       |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SESSION_TTL_HOURS`        | `24` (1 to 8760)           |
    /// | `LOG_FORMAT`               | `pretty`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_env("PORT", "8080", "u16")?;
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty());
        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", "10", "u32")?;

        let raw_origins =
            std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into());
        let cors_origins = parse_origins(&raw_origins)?;

        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", "30", "u64")?;

        let session_ttl_hours = check_session_ttl(parse_env(
            "SESSION_TTL_HOURS",
            &DEFAULT_SESSION_TTL_HOURS.to_string(),
            TTL_EXPECTED,
        )?)?;

        let log_format = parse_env("LOG_FORMAT", "pretty", "log format (pretty|json)")?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            cors_origins,
            request_timeout_secs,
            session_ttl_hours,
            log_format,
        })
    }

    /// The database URL, or an error naming the missing variable.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS))
    }
}

fn parse_env<T: FromStr>(
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = std::env::var(name).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value,
        expected,
    })
}

const TTL_EXPECTED: &str = "number of hours between 1 and 8760";

fn check_session_ttl(hours: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::Invalid {
            name: "SESSION_TTL_HOURS",
            value: hours.to_string(),
            expected: TTL_EXPECTED,
        })
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            origin.parse().map_err(|_| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: origin.to_string(),
                expected: "comma-separated list of origins",
            })
        })
        .collect()
}
