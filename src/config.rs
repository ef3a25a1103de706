// config.rs - Environment configuration
//
// Every setting has a default; unset variables are logged and defaulted,
// malformed ones are an error.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::web_app::model::DiscoverySettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which product backend the storefront talks to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    PocketBase,
    Rest,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pocketbase" => Ok(Self::PocketBase),
            "rest" => Ok(Self::Rest),
            other => Err(format!("expected `pocketbase` or `rest`, got `{other}`")),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PocketBase => f.write_str("pocketbase"),
            Self::Rest => f.write_str("rest"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub backend: Backend,
    pub backend_url: String,
    pub per_page: u32,
    pub search_debounce_ms: u64,
    pub price_debounce_ms: u64,
    pub fetch_retries: usize,
    pub retry_min_delay_ms: u64,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub translation_url: String,
    pub source_language: String,
    pub translation_cache_ttl_secs: u64,
}

impl Config {
    /// Read `.env` (if any) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            backend: try_load(&lookup, "STOREFRONT_BACKEND", "pocketbase")?,
            backend_url: try_load::<String>(&lookup, "BACKEND_URL", "http://127.0.0.1:8090")?
                .trim_end_matches('/')
                .to_string(),
            per_page: try_load(&lookup, "PRODUCTS_PER_PAGE", "6")?,
            search_debounce_ms: try_load(&lookup, "SEARCH_DEBOUNCE_MS", "300")?,
            price_debounce_ms: try_load(&lookup, "PRICE_DEBOUNCE_MS", "300")?,
            fetch_retries: try_load(&lookup, "FETCH_RETRIES", "2")?,
            retry_min_delay_ms: try_load(&lookup, "RETRY_MIN_DELAY_MS", "200")?,
            cache_ttl_secs: try_load(&lookup, "CACHE_TTL_SECS", "300")?,
            request_timeout_secs: try_load(&lookup, "REQUEST_TIMEOUT_SECS", "10")?,
            translation_url: try_load(
                &lookup,
                "TRANSLATION_URL",
                "https://api.mymemory.translated.net/get",
            )?,
            source_language: try_load(&lookup, "SOURCE_LANGUAGE", "es")?,
            translation_cache_ttl_secs: try_load(&lookup, "TRANSLATION_CACHE_TTL_SECS", "3600")?,
        };
        if config.per_page == 0 {
            return Err(ConfigError::Invalid {
                key: "PRODUCTS_PER_PAGE",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Settings the browser needs
    pub fn discovery_settings(&self) -> DiscoverySettings {
        DiscoverySettings {
            per_page: self.per_page,
            search_debounce_ms: self.search_debounce_ms,
            price_debounce_ms: self.price_debounce_ms,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_min_delay(&self) -> Duration {
        Duration::from_millis(self.retry_min_delay_ms)
    }

    pub fn translation_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.translation_cache_ttl_secs)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}
