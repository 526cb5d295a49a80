//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup (binaries read the environment, then call
//! the parsing helpers below) and passed into core services. Nothing in this crate reads
//! environment variables while handling a request.

use crate::constants::{AUTO_SAVE_INTERVAL, DEFAULT_DATABASE_URL, SESSION_IDLE_PERIODS};
use crate::{PromptDeskError, PromptDeskResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_url: String,
    auto_save_interval: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PromptDeskError::InvalidInput` if the database URL is not a `sqlite:` URL or the
    /// auto-save interval is zero.
    pub fn new(database_url: String, auto_save_interval: Duration) -> PromptDeskResult<Self> {
        if !database_url.trim().starts_with("sqlite:") {
            return Err(PromptDeskError::InvalidInput(format!(
                "database url must start with 'sqlite:', got '{}'",
                database_url
            )));
        }
        if auto_save_interval.is_zero() {
            return Err(PromptDeskError::InvalidInput(
                "auto-save interval must be greater than zero".into(),
            ));
        }

        Ok(Self {
            database_url: database_url.trim().to_string(),
            auto_save_interval,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn auto_save_interval(&self) -> Duration {
        self.auto_save_interval
    }

    /// How long an open draft session may go without client activity before it is closed.
    pub fn session_idle_timeout(&self) -> Duration {
        self.auto_save_interval * SESSION_IDLE_PERIODS
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auto_save_interval: AUTO_SAVE_INTERVAL,
        }
    }
}

/// Resolve the database URL from an optional environment value.
///
/// `None` or a blank value falls back to [`DEFAULT_DATABASE_URL`].
pub fn database_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Parse the auto-save period (whole seconds) from an optional environment value.
///
/// `None` or a blank value yields [`AUTO_SAVE_INTERVAL`].
pub fn auto_save_interval_from_env_value(value: Option<String>) -> PromptDeskResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(AUTO_SAVE_INTERVAL),
        Some(v) => {
            let secs = v.parse::<u64>().map_err(|_| {
                PromptDeskError::InvalidInput(format!(
                    "auto-save interval must be a whole number of seconds, got '{}'",
                    v
                ))
            })?;
            Ok(Duration::from_secs(secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_non_sqlite_url() {
        let err = CoreConfig::new("postgres://localhost/db".into(), AUTO_SAVE_INTERVAL)
            .expect_err("non-sqlite url should be rejected");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_new_rejects_zero_interval() {
        let err = CoreConfig::new("sqlite::memory:".into(), Duration::ZERO)
            .expect_err("zero interval should be rejected");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_session_idle_timeout_follows_auto_save_period() {
        let cfg = CoreConfig::new("sqlite::memory:".into(), Duration::from_secs(60)).unwrap();
        assert_eq!(cfg.session_idle_timeout(), Duration::from_secs(180));
    }

    #[test]
    fn test_database_url_defaults_when_blank() {
        assert_eq!(database_url_from_env_value(None), DEFAULT_DATABASE_URL);
        assert_eq!(
            database_url_from_env_value(Some("   ".into())),
            DEFAULT_DATABASE_URL
        );
        assert_eq!(
            database_url_from_env_value(Some(" sqlite://other.db ".into())),
            "sqlite://other.db"
        );
    }

    #[test]
    fn test_auto_save_interval_parsing() {
        assert_eq!(
            auto_save_interval_from_env_value(None).unwrap(),
            AUTO_SAVE_INTERVAL
        );
        assert_eq!(
            auto_save_interval_from_env_value(Some("30".into())).unwrap(),
            Duration::from_secs(30)
        );
        assert!(auto_save_interval_from_env_value(Some("5m".into())).is_err());
    }
}
