//! Environment-backed configuration.

use std::{env, path::PathBuf, str::FromStr};

use thiserror::Error;

/// Default maximum decoded frame size (5 MiB).
const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_PORT: u16 = 10000;
const DEFAULT_SCREENS_DIR: &str = "screens";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid number: {value:?}")]
    BadNumber { name: &'static str, value: String },
}

/// Telegram notification credentials.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Runtime configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared viewer access secret.
    pub password: String,
    /// Notification credentials; `None` disables notifications.
    pub telegram: Option<TelegramConfig>,
    /// Maximum accepted decoded frame size in bytes.
    pub max_image_bytes: usize,
    /// Directory holding one frame blob per session.
    pub screens_dir: PathBuf,
    /// Listen port.
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `GLOBAL_PASSWORD` is required. Notifications are enabled only when
    /// both `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` are present and
    /// non-empty. Malformed numeric values are a startup error rather than a
    /// silent fallback.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on a missing password or malformed number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let password = env::var("GLOBAL_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("GLOBAL_PASSWORD"))?;

        let bot_token = trimmed_var("TELEGRAM_BOT_TOKEN");
        let chat_id = trimmed_var("TELEGRAM_CHAT_ID");
        let telegram = match (bot_token, chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };

        Ok(Self {
            password,
            telegram,
            max_image_bytes: parsed_var("MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
            screens_dir: env::var("SCREENS_DIR")
                .map_or_else(|_| PathBuf::from(DEFAULT_SCREENS_DIR), PathBuf::from),
            port: parsed_var("PORT", DEFAULT_PORT)?,
        })
    }
}

fn trimmed_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::BadNumber { name, value }),
        Err(_) => Ok(default),
    }
}
