use chrono::TimeDelta;
use std::env;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://greenhouse.db?mode=rwc";
pub const DEFAULT_MEASUREMENT_INTERVAL_SECONDS: u64 = 5;
/// 2h, 8h, 1d, 3d, 6d.
pub const DEFAULT_BACKFILL_OFFSETS_MINUTES: [i64; 5] = [120, 480, 1440, 4320, 8640];

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,
    pub database_max_connections: u32,
    pub store_timeout_seconds: u64,

    // Measurements
    pub measurement_interval_seconds: u64,
    pub backfill_enabled: bool,
    pub backfill_offsets: Vec<TimeDelta>,

    // Data clearing; `None` disables the action
    pub clear_data_password: Option<String>,

    // API settings
    pub api_host: String,
    pub api_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: 4,
            store_timeout_seconds: 10,
            measurement_interval_seconds: DEFAULT_MEASUREMENT_INTERVAL_SECONDS,
            backfill_enabled: false,
            backfill_offsets: DEFAULT_BACKFILL_OFFSETS_MINUTES
                .into_iter()
                .map(TimeDelta::minutes)
                .collect(),
            clear_data_password: None,
            api_host: "0.0.0.0".to_string(),
            api_port: 5000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let measurement_interval_seconds = parse_var(
            "MEASUREMENT_INTERVAL_SECONDS",
            defaults.measurement_interval_seconds,
        )?;
        if measurement_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                var: "MEASUREMENT_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }

        let backfill_offsets = match env::var("BACKFILL_OFFSETS_MINUTES") {
            Ok(raw) if !raw.trim().is_empty() => parse_offsets(&raw)?,
            _ => defaults.backfill_offsets,
        };

        Ok(Self {
            // Database
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            store_timeout_seconds: parse_var("STORE_TIMEOUT_SECONDS", defaults.store_timeout_seconds)?,

            // Measurements
            measurement_interval_seconds,
            backfill_enabled: parse_var("BACKFILL_ENABLED", defaults.backfill_enabled)?,
            backfill_offsets,

            clear_data_password: env::var("CLEAR_DATA_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),

            // API settings
            api_host: env::var("API_HOST").unwrap_or(defaults.api_host),
            api_port: parse_var("API_PORT", defaults.api_port)?,
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

/// Comma-separated minute offsets, e.g. `120,480,1440`.
///
/// # Errors
///
/// `ConfigError::Invalid` if any entry is not a positive whole number of minutes.
pub fn parse_offsets(raw: &str) -> Result<Vec<TimeDelta>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .and_then(TimeDelta::try_minutes)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "BACKFILL_OFFSETS_MINUTES",
                    value: raw.to_string(),
                })
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
