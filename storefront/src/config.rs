// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Shape of the log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "pretty" | "text" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(format!("expected 'pretty' or 'json', got '{}'", other)),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the server on the in-memory store.
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  /// Replace the catalog with the demo products on startup.
  pub seed_db: bool,
  pub session_ttl_hours: i64,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      database_max_connections: 5,
      seed_db: false,
      session_ttl_hours: 168,
      log_format: LogFormat::Pretty,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable source; unset variables fall
  /// back to the defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let server_host = lookup("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_var(&lookup, "SERVER_PORT", defaults.server_port)?;
    let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
    let database_max_connections = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.database_max_connections)?;
    let seed_db = parse_var(&lookup, "SEED_DB", defaults.seed_db)?;
    let session_ttl_hours = parse_var(&lookup, "SESSION_TTL_HOURS", defaults.session_ttl_hours)?;
    let log_format = parse_var(&lookup, "LOG_FORMAT", defaults.log_format)?;

    if session_ttl_hours <= 0 {
      return Err(AppError::Config("SESSION_TTL_HOURS must be positive".to_string()));
    }

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      seed_db,
      session_ttl_hours,
      log_format,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(name) {
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
    None => Ok(default),
  }
}
