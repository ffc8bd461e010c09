use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_STATUS_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Status service endpoint queried every cycle
    pub status_endpoint: String,

    /// Pause between two poll cycles, in seconds (default: 600)
    pub retry_interval_secs: u64,

    /// Upper bound for a single status query or chat delivery, in seconds (default: 30)
    pub http_timeout_secs: u64,

    /// Directory for JSON log files. Console-only logging when unset.
    pub log_dir: Option<PathBuf>,

    /// Telegram Bot API server (default: the public one)
    pub telegram_api_base: String,

    /// Credentials as found in the environment; checked by [`RawCredentials::require`].
    pub credentials: RawCredentials,
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            status_endpoint: lookup("STATUS_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_STATUS_ENDPOINT.to_string()),
            retry_interval_secs: parse_secs(
                "RETRY_INTERVAL_SECS",
                lookup("RETRY_INTERVAL_SECS"),
                DEFAULT_RETRY_INTERVAL_SECS,
            )?,
            http_timeout_secs: parse_secs(
                "HTTP_TIMEOUT_SECS",
                lookup("HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?,
            log_dir: log_dir_from_lookup(&lookup),
            telegram_api_base: lookup("TELEGRAM_API_BASE")
                .filter(|base| !base.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            credentials: RawCredentials {
                practicum_token: lookup(PRACTICUM_TOKEN),
                telegram_token: lookup(TELEGRAM_TOKEN),
                telegram_chat_id: lookup(TELEGRAM_CHAT_ID),
            },
        })
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// `LOG_DIR` alone, so logging can start before the rest of the
/// configuration is parsed and any parse error reaches the log.
pub fn log_dir_from_env() -> Option<PathBuf> {
    dotenvy::dotenv().ok();
    log_dir_from_lookup(|name| std::env::var(name).ok())
}

pub fn log_dir_from_lookup<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_DIR")
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
}

fn parse_secs(name: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "must be greater than zero",
        }),
        Ok(secs) => Ok(secs),
        Err(_) => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "must be a whole number of seconds",
        }),
    }
}

/// Credentials exactly as read from the environment, before the startup check.
#[derive(Clone, Default)]
pub struct RawCredentials {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

/// Credentials that passed the startup check.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl RawCredentials {
    /// Startup precondition: every credential must be present and non-blank.
    ///
    /// Each missing value is logged on its own; the returned error lists all of them.
    pub fn require(&self) -> Result<Credentials, ConfigError> {
        let mut missing = Vec::new();

        let practicum_token = present(PRACTICUM_TOKEN, &self.practicum_token, &mut missing);
        let telegram_token = present(TELEGRAM_TOKEN, &self.telegram_token, &mut missing);
        let telegram_chat_id = present(TELEGRAM_CHAT_ID, &self.telegram_chat_id, &mut missing);

        match (practicum_token, telegram_token, telegram_chat_id) {
            (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) => {
                Ok(Credentials {
                    practicum_token,
                    telegram_token,
                    telegram_chat_id,
                })
            }
            _ => Err(ConfigError::MissingCredentials { missing }),
        }
    }
}

fn present(
    name: &'static str,
    value: &Option<String>,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            tracing::error!(variable = name, "Required credential is missing");
            missing.push(name);
            None
        }
    }
}

fn redact(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "<set>",
        None => "<unset>",
    }
}

impl fmt::Debug for RawCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawCredentials")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}
