//! Environment-driven panel configuration.

use campanel_link::TimeoutPolicy;
use campanel_ui::Locale;
use thiserror::Error;
use url::Url;

/// Device base URL variable.
pub const DEVICE_URL_ENV: &str = "CAMPANEL_DEVICE_URL";
/// Display language variable (`en`, `ja`).
pub const LOCALE_ENV: &str = "CAMPANEL_LOCALE";
/// Log filter variable, in `tracing_subscriber::EnvFilter` syntax.
pub const LOG_ENV: &str = "CAMPANEL_LOG";

/// Address of the device in its own access-point mode.
pub const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";
/// Log filter used when [`LOG_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration of one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Device base URL.
    pub device_url: Url,
    /// Display language.
    pub locale: Locale,
    /// Log filter directive.
    pub log_filter: String,
    /// Per-endpoint timeouts; not read from the environment.
    pub timeouts: TimeoutPolicy,
}

impl PanelConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    /// See [`PanelConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`. Unset or blank values fall back
    /// to defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for an invalid device URL or an unknown locale.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let device_url = validate_device_url(
            read(DEVICE_URL_ENV)
                .as_deref()
                .unwrap_or(DEFAULT_DEVICE_URL),
        )?;
        let locale = match read(LOCALE_ENV) {
            Some(raw) => Locale::from_tag(&raw).ok_or(ConfigError::UnknownLocale(raw))?,
            None => Locale::default(),
        };

        Ok(Self {
            device_url,
            locale,
            log_filter: read(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            timeouts: TimeoutPolicy::default(),
        })
    }
}

/// Parses a device base URL and checks its scheme.
///
/// # Errors
/// Returns [`ConfigError::InvalidUrl`] when the value does not parse and
/// [`ConfigError::UnsupportedScheme`] for anything but `http`/`https`.
pub fn validate_device_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|error| ConfigError::InvalidUrl {
        value: raw.to_string(),
        reason: error.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(ConfigError::InvalidUrl {
            value: raw.to_string(),
            reason: "missing host".to_string(),
        }),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Device URL does not parse.
    #[error("invalid device url {value:?}: {reason}")]
    InvalidUrl {
        /// Offending value.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// Device URL uses a scheme other than http/https.
    #[error("unsupported device url scheme: {0}")]
    UnsupportedScheme(String),
    /// Locale tag is not supported.
    #[error("unsupported locale: {0}")]
    UnknownLocale(String),
}
