//! Process configuration from environment variables.
//!
//! Secrets (`PAYMENT_KEY_SECRET`, `IDENTITY_API_KEY`) may instead be mounted as files
//! under `/run/secrets/<NAME>`; the environment wins when both are present.

use crate::error::{DomainError, ErrorKind};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Configure exactly one of IDENTITY_USER_URL or IDENTITY_TOKENS_FILE")]
    IdentitySource,
}

impl DomainError for ConfigError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }

    fn code(&self) -> &'static str {
        "CONFIG_ERROR"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentitySource {
    Remote {
        user_url: String,
        api_key: Option<String>,
        timeout: Duration,
    },
    TokensFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub admin_emails: Vec<String>,
    pub catalog_seed: Option<PathBuf>,
    pub catalog_timeout: Duration,
    pub currency: String,
    pub payment: PaymentConfig,
    pub identity: IdentitySource,
}

/// Where values come from: a variable lookup plus a directory of secret files.
struct Source<F> {
    var: F,
    secrets_dir: PathBuf,
}

impl<F: Fn(&str) -> Option<String>> Source<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.var)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn secret(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| {
            std::fs::read_to_string(self.secrets_dir.join(key))
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        }
    }

    fn millis_or(&self, key: &'static str, default: u64) -> Result<Duration, ConfigError> {
        let ms: u64 = self.parse_or(key, default)?;
        if ms == 0 {
            return Err(ConfigError::Invalid {
                key,
                value: ms.to_string(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(Duration::from_millis(ms))
    }
}

impl Config {
    /// Reads the process environment and `/run/secrets`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(|key| std::env::var(key).ok(), Path::new(DEFAULT_SECRETS_DIR))
    }

    pub fn from_sources<F>(var: F, secrets_dir: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let src = Source {
            var,
            secrets_dir: secrets_dir.to_path_buf(),
        };

        let admin_emails: Vec<String> = src
            .get("CAFE_ADMIN_EMAILS")
            .map(|list| {
                list.split(',')
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let payment = PaymentConfig {
            key_id: src
                .secret("PAYMENT_KEY_ID")
                .ok_or(ConfigError::Missing("PAYMENT_KEY_ID"))?,
            key_secret: src
                .secret("PAYMENT_KEY_SECRET")
                .ok_or(ConfigError::Missing("PAYMENT_KEY_SECRET"))?,
            api_base: src
                .get("PAYMENT_API_BASE")
                .unwrap_or_else(|| "https://api.razorpay.com".to_string()),
            timeout: src.millis_or("PAYMENT_TIMEOUT_MS", 5000)?,
        };

        let identity = match (src.get("IDENTITY_USER_URL"), src.get("IDENTITY_TOKENS_FILE")) {
            (Some(user_url), None) => IdentitySource::Remote {
                user_url,
                api_key: src.secret("IDENTITY_API_KEY"),
                timeout: src.millis_or("IDENTITY_TIMEOUT_MS", 3000)?,
            },
            (None, Some(path)) => IdentitySource::TokensFile(PathBuf::from(path)),
            _ => return Err(ConfigError::IdentitySource),
        };

        let config = Self {
            port: src.parse_or("CAFE_PORT", 8080)?,
            admin_emails,
            catalog_seed: src.get("CAFE_CATALOG_SEED").map(PathBuf::from),
            catalog_timeout: src.millis_or("CAFE_CATALOG_TIMEOUT_MS", 2000)?,
            currency: src
                .get("CAFE_CURRENCY")
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| "INR".to_string()),
            payment,
            identity,
        };
        info!(
            port = config.port,
            admins = config.admin_emails.len(),
            currency = %config.currency,
            "Configuration loaded"
        );
        Ok(config)
    }
}
