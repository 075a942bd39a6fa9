use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::{
    DEFAULT_CHECKPOINT_PATH, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LISTING_URL, DEFAULT_SITE_ORIGIN,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Listing page
    pub listing_url: Url,
    pub site_origin: Url,

    // Discord
    pub webhook_url: Option<String>,

    // Checkpoint
    pub checkpoint_path: PathBuf,

    // HTTP
    pub http_timeout: Duration,

    // Process
    pub strict_exit_codes: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing `DISCORD_WEBHOOK_URL` is not an error here; the notifier
    /// reports it when a notification is attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            listing_url: parse_env_url("LISTING_URL", DEFAULT_LISTING_URL)?,
            site_origin: parse_env_url("SITE_ORIGIN", DEFAULT_SITE_ORIGIN)?,

            webhook_url: optional_env("DISCORD_WEBHOOK_URL"),

            checkpoint_path: PathBuf::from(env_or_default(
                "CHECKPOINT_PATH",
                DEFAULT_CHECKPOINT_PATH,
            )),

            http_timeout: Duration::from_secs(parse_env_u64(
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),

            strict_exit_codes: parse_env_bool("STRICT_EXIT_CODES", false)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        for (name, url) in [
            ("LISTING_URL", &self.listing_url),
            ("SITE_ORIGIN", &self.site_origin),
        ] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: format!("must be an http(s) URL, got '{url}'"),
                });
            }
        }
        Ok(())
    }

    /// Configuration with built-in defaults and no webhook.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            listing_url: Url::parse(DEFAULT_LISTING_URL).expect("valid default listing URL"),
            site_origin: Url::parse(DEFAULT_SITE_ORIGIN).expect("valid default site origin"),
            webhook_url: None,
            checkpoint_path: PathBuf::from(DEFAULT_CHECKPOINT_PATH),
            http_timeout: Duration::from_secs(5),
            strict_exit_codes: false,
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_url(name: &str, default: &str) -> Result<Url, ConfigError> {
    let value = env_or_default(name, default);
    Url::parse(&value).map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        message: format!("'{value}' is not a valid URL: {e}"),
    })
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
