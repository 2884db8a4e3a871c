//! Configuration loaded from the process environment.
//!
//! Loaders take a lookup function so they can be exercised without touching
//! the real environment; `from_env` wires them to `std::env::var`.

use std::time::Duration;

use chrono::FixedOffset;
use thiserror::Error;

use posreports_reports::ReportSettings;
use posreports_reports::settings::MAX_PERIOD_DAYS;

pub const BACKEND_URL_VAR: &str = "POSREPORTS_BACKEND_URL";
pub const BACKEND_KEY_VAR: &str = "POSREPORTS_BACKEND_KEY";
pub const BACKEND_TIMEOUT_VAR: &str = "POSREPORTS_BACKEND_TIMEOUT_SECS";

pub const CURRENCY_VAR: &str = "POSREPORTS_CURRENCY";
pub const UTC_OFFSET_VAR: &str = "POSREPORTS_UTC_OFFSET_MINUTES";
pub const RANKING_LIMIT_VAR: &str = "POSREPORTS_RANKING_LIMIT";
pub const PERIOD_DAYS_VAR: &str = "POSREPORTS_PERIOD_DAYS";

/// Default request timeout for backend queries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Connection settings for the hosted REST backend.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project URL without the `/rest/v1` suffix.
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

// The key is a credential; keep it out of logs.
impl core::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, BACKEND_URL_VAR)?;
        let api_key = required(&lookup, BACKEND_KEY_VAR)?;

        let mut config = Self::new(base_url, api_key);
        if let Some(secs) = parse_optional::<u64, _>(&lookup, BACKEND_TIMEOUT_VAR)? {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// Report settings with environment overrides applied over the defaults.
pub fn settings_from_env() -> Result<ReportSettings, ConfigError> {
    settings_from_lookup(env_lookup)
}

pub fn settings_from_lookup<F>(lookup: F) -> Result<ReportSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = ReportSettings::default();

    if let Some(currency) = non_empty(&lookup, CURRENCY_VAR) {
        settings = settings.with_currency(currency);
    }
    if let Some(minutes) = parse_optional::<i32, _>(&lookup, UTC_OFFSET_VAR)? {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                var: UTC_OFFSET_VAR,
                reason: format!("{minutes} minutes is out of range"),
            })?;
        settings = settings.with_utc_offset(offset);
    }
    if let Some(limit) = parse_optional::<usize, _>(&lookup, RANKING_LIMIT_VAR)? {
        settings = settings.with_ranking_limit(limit);
    }
    if let Some(days) = parse_optional::<u32, _>(&lookup, PERIOD_DAYS_VAR)? {
        if days > MAX_PERIOD_DAYS {
            return Err(ConfigError::Invalid {
                var: PERIOD_DAYS_VAR,
                reason: format!("{days} days exceeds the {MAX_PERIOD_DAYS} day limit"),
            });
        }
        settings = settings.with_period_days(days);
    }

    Ok(settings)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, var).ok_or(ConfigError::Missing(var))
}

fn parse_optional<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, var)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                var,
                reason: format!("'{raw}': {e}"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn backend_config_requires_url_and_key() {
        let err = BackendConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(BACKEND_URL_VAR));

        let err = BackendConfig::from_lookup(lookup(&[(BACKEND_URL_VAR, "https://x.test")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(BACKEND_KEY_VAR));

        let err = BackendConfig::from_lookup(lookup(&[
            (BACKEND_URL_VAR, "  "),
            (BACKEND_KEY_VAR, "k"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(BACKEND_URL_VAR));
    }

    #[test]
    fn backend_config_trims_trailing_slash_and_defaults_timeout() {
        let config = BackendConfig::from_lookup(lookup(&[
            (BACKEND_URL_VAR, "https://abc.supabase.co/"),
            (BACKEND_KEY_VAR, "anon"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://abc.supabase.co");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn backend_config_reads_timeout() {
        let config = BackendConfig::from_lookup(lookup(&[
            (BACKEND_URL_VAR, "https://abc.supabase.co"),
            (BACKEND_KEY_VAR, "anon"),
            (BACKEND_TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));

        let err = BackendConfig::from_lookup(lookup(&[
            (BACKEND_URL_VAR, "https://abc.supabase.co"),
            (BACKEND_KEY_VAR, "anon"),
            (BACKEND_TIMEOUT_VAR, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: BACKEND_TIMEOUT_VAR, .. }));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = BackendConfig::new("https://abc.supabase.co", "secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn settings_default_without_overrides() {
        assert_eq!(settings_from_lookup(lookup(&[])).unwrap(), ReportSettings::default());
    }

    #[test]
    fn settings_apply_overrides() {
        let settings = settings_from_lookup(lookup(&[
            (CURRENCY_VAR, "EUR"),
            (UTC_OFFSET_VAR, "60"),
            (RANKING_LIMIT_VAR, "5"),
            (PERIOD_DAYS_VAR, "7"),
        ]))
        .unwrap();
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.utc_offset.local_minus_utc(), 3600);
        assert_eq!(settings.ranking_limit, 5);
        assert_eq!(settings.period_days, 7);
    }

    #[test]
    fn settings_reject_out_of_range_offset() {
        let err = settings_from_lookup(lookup(&[(UTC_OFFSET_VAR, "100000")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: UTC_OFFSET_VAR, .. }));
    }

    #[test]
    fn settings_reject_period_beyond_limit() {
        let err = settings_from_lookup(lookup(&[(PERIOD_DAYS_VAR, "4000000000")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: PERIOD_DAYS_VAR, .. }));

        let longest = settings_from_lookup(lookup(&[(PERIOD_DAYS_VAR, "3660")])).unwrap();
        assert_eq!(longest.period_days, MAX_PERIOD_DAYS);
    }
}
