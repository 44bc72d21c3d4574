// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Credentials are required and missing ones abort startup; everything
//! else falls back to a sensible default.

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// MyGES account username
    pub username: String,
    /// MyGES account password
    pub password: String,
    /// Minutes between two scheduled calendar refreshes
    pub fetch_interval_minutes: u64,
    /// Timezone used for every emitted calendar timestamp
    pub timezone: Tz,
    /// Server port
    pub port: u16,
    /// Path of the on-disk access token cache
    pub token_cache_path: PathBuf,
    /// Path of the on-disk calendar cache
    pub calendar_cache_path: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            username: "test_user".to_string(),
            password: "test_password".to_string(),
            fetch_interval_minutes: 60,
            timezone: chrono_tz::Europe::Paris,
            port: 8080,
            token_cache_path: PathBuf::from("token.json"),
            calendar_cache_path: PathBuf::from("calendar.ics"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored if present. `MYGES_USERNAME` and
    /// `MYGES_PASSWORD` are required; everything else is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let timezone_name =
            env::var("CALENDAR_TIMEZONE").unwrap_or_else(|_| "Europe/Paris".to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::Invalid("CALENDAR_TIMEZONE", timezone_name))?;

        Ok(Self {
            username: env::var("MYGES_USERNAME")
                .map_err(|_| ConfigError::Missing("MYGES_USERNAME"))?,
            password: env::var("MYGES_PASSWORD")
                .map_err(|_| ConfigError::Missing("MYGES_PASSWORD"))?,
            fetch_interval_minutes: env::var("FETCH_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            timezone,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            token_cache_path: env::var("TOKEN_CACHE_PATH")
                .unwrap_or_else(|_| "token.json".to_string())
                .into(),
            calendar_cache_path: env::var("CALENDAR_CACHE_PATH")
                .unwrap_or_else(|_| "calendar.ics".to_string())
                .into(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env var mutations cannot race each other.
    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("MYGES_USERNAME", "test_user");
        env::set_var("MYGES_PASSWORD", "test_password");
        env::remove_var("CALENDAR_TIMEZONE");
        env::remove_var("FETCH_INTERVAL_MINUTES");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.username, "test_user");
        assert_eq!(config.password, "test_password");
        assert_eq!(config.fetch_interval_minutes, 60);
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
        assert_eq!(config.port, 8080);

        env::set_var("CALENDAR_TIMEZONE", "Mars/Olympus_Mons");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("CALENDAR_TIMEZONE", _)));
        env::remove_var("CALENDAR_TIMEZONE");
    }
}
