//! Configuration module for the portfolio backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::notify::RetryPolicy;

/// Recipient used when PORTFOLIO_CONTACT_TO is not set.
pub const DEFAULT_CONTACT_TO: &str = "alex.chen@email.com";
/// Sender used when PORTFOLIO_CONTACT_FROM is not set.
pub const DEFAULT_CONTACT_FROM: &str = "noreply@portfolio.local";

/// A setting that is present but cannot be used.
#[derive(Debug)]
pub enum ConfigError {
    BindAddr(AddrParseError),
    InvalidNumber { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BindAddr(err) => write!(f, "invalid PORTFOLIO_BIND_ADDR: {}", err),
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "invalid {}={:?}: expected a non-negative integer", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<AddrParseError> for ConfigError {
    fn from(err: AddrParseError) -> Self {
        ConfigError::BindAddr(err)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Contact email relay settings.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SendGrid API key; relay is disabled when absent
    pub sendgrid_api_key: Option<String>,
    /// Where contact notifications are sent
    pub to: String,
    /// Verified sender address
    pub from: String,
    /// Notification queue capacity
    pub queue_capacity: usize,
    /// Delivery attempts per notification
    pub max_attempts: u32,
}

impl EmailConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Plain text or JSON log lines
    pub log_format: LogFormat,
    /// Directory holding the built frontend, served for unmatched paths
    pub static_dir: Option<PathBuf>,
    /// Mount the content-editing and inbox routes
    pub admin_routes: bool,
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("PORTFOLIO_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()?;

        let log_level = env::var("PORTFOLIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("PORTFOLIO_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let static_dir = env::var("PORTFOLIO_STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let admin_routes = env_flag("PORTFOLIO_ADMIN_ROUTES");

        let email = EmailConfig {
            sendgrid_api_key: env::var("SENDGRID_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            to: env::var("PORTFOLIO_CONTACT_TO").unwrap_or_else(|_| DEFAULT_CONTACT_TO.to_string()),
            from: env::var("PORTFOLIO_CONTACT_FROM")
                .unwrap_or_else(|_| DEFAULT_CONTACT_FROM.to_string()),
            queue_capacity: env_number("PORTFOLIO_NOTIFY_QUEUE", 64)?,
            max_attempts: env_number("PORTFOLIO_NOTIFY_ATTEMPTS", 3)?,
        };

        Ok(Self {
            bind_addr,
            log_level,
            log_format,
            static_dir,
            admin_routes,
            email,
        })
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).map(|v| v.to_ascii_lowercase()).as_deref(),
        Ok("1" | "true" | "yes" | "on")
    )
}

fn env_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(default),
    }
}
