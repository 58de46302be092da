use std::env;
use std::fmt;
use std::str::FromStr;

use crate::ingestion::dedup::{DedupConfig, DEFAULT_RECENT_WINDOW, DEFAULT_TITLE_THRESHOLD};
use crate::ingestion::discovery::DEFAULT_DISCOVERY_TTL_SECS;
use crate::ingestion::quota::{
    QuotaLimits, DEFAULT_INITIAL_PER_SOURCE, DEFAULT_MAX_ATTEMPTS, DEFAULT_TARGET_TOTAL,
    MIN_ADDITIONAL_PER_SOURCE,
};

/// Distinguishes runtime behavior for different stages of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for an ingestion or scoring run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub ingestion: IngestionConfig,
    pub dedup: DedupConfig,
    pub discovery: DiscoveryConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let ingestion = IngestionConfig {
            target_total: parse_var("INGEST_TARGET_TOTAL", DEFAULT_TARGET_TOTAL)?,
            per_source: positive(
                "INGEST_PER_SOURCE",
                parse_var("INGEST_PER_SOURCE", DEFAULT_INITIAL_PER_SOURCE)?,
            )?,
            max_attempts: parse_var("INGEST_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
        };

        let title_threshold = parse_var("DEDUP_TITLE_THRESHOLD", DEFAULT_TITLE_THRESHOLD)?;
        if !(0.0..=1.0).contains(&title_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(title_threshold));
        }
        let dedup = DedupConfig {
            recent_window: positive(
                "DEDUP_RECENT_WINDOW",
                parse_var("DEDUP_RECENT_WINDOW", DEFAULT_RECENT_WINDOW)?,
            )?,
            title_threshold,
        };

        let discovery = DiscoveryConfig {
            cache_ttl_secs: parse_var("DISCOVERY_CACHE_TTL_SECS", DEFAULT_DISCOVERY_TTL_SECS)?,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            ingestion,
            dedup,
            discovery,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Quota targets for one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionConfig {
    pub target_total: usize,
    pub per_source: usize,
    pub max_attempts: u32,
}

impl IngestionConfig {
    pub fn quota_limits(&self) -> QuotaLimits {
        QuotaLimits {
            max_attempts: self.max_attempts,
            min_additional_per_source: MIN_ADDITIONAL_PER_SOURCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub cache_ttl_secs: u64,
}

impl DiscoveryConfig {
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.cache_ttl_secs).unwrap_or(i64::MAX))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
        }
        _ => Ok(default),
    }
}

fn positive(key: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        Err(ConfigError::MustBePositive { key })
    } else {
        Ok(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    MustBePositive { key: &'static str },
    ThresholdOutOfRange(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a number, got '{value}'")
            }
            ConfigError::MustBePositive { key } => write!(f, "{key} must be greater than zero"),
            ConfigError::ThresholdOutOfRange(value) => {
                write!(f, "DEDUP_TITLE_THRESHOLD must lie in [0, 1], got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
