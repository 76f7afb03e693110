//! Configuration module for loading environment variables and settings.

use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the speech service subscription key.
pub const SUBSCRIPTION_KEY_VAR: &str = "AZUREKEY";

/// Environment variable selecting the service region.
pub const REGION_VAR: &str = "AZURE_REGION";

/// Environment variable overriding the token refresh cadence, in seconds.
pub const REFRESH_SECS_VAR: &str = "AZURE_TTS_REFRESH_SECS";

/// Environment variable enabling the directory-backed voice catalog.
pub const VOICE_DIRECTORY_VAR: &str = "AZURE_TTS_VOICE_DIRECTORY";

/// Region used when `AZURE_REGION` is unset. Free tier keys are served from West US 2.
pub const DEFAULT_REGION: &str = "westus2";

/// Tokens live for 10 minutes; refresh every 9.
pub const DEFAULT_REFRESH_SECS: u64 = 9 * 60;

/// Client configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Speech service subscription key (required)
    pub subscription_key: String,
    /// Service region name, e.g. `westus2`
    pub region: String,
    /// Interval between background token refreshes
    pub refresh_interval: Duration,
    /// Build the voice catalog from the service's voice list instead of the built-in table
    pub voice_directory: bool,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if AZUREKEY is not set, or
    /// `ConfigError::InvalidValue` if an optional variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of touching the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let subscription_key = lookup(SUBSCRIPTION_KEY_VAR)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::missing_env_var(SUBSCRIPTION_KEY_VAR))?;

        let region = lookup(REGION_VAR)
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let refresh_secs = match lookup(REFRESH_SECS_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::invalid_value(
                        REFRESH_SECS_VAR,
                        format!("expected a positive number of seconds, got '{}'", raw),
                    ));
                }
            },
            None => DEFAULT_REFRESH_SECS,
        };

        let voice_directory = match lookup(VOICE_DIRECTORY_VAR) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ConfigError::invalid_value(
                    VOICE_DIRECTORY_VAR,
                    format!("expected true/false, got '{}'", raw),
                )
            })?,
            None => false,
        };

        Ok(Self {
            subscription_key,
            region,
            refresh_interval: Duration::from_secs(refresh_secs),
            voice_directory,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("subscription_key", &"<redacted>")
            .field("region", &self.region)
            .field("refresh_interval", &self.refresh_interval)
            .field("voice_directory", &self.voice_directory)
            .finish()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
