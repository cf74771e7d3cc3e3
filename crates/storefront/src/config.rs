//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SCODER_CATALOG_URL` - Product catalog endpoint (default: <https://fakestoreapi.com/products>)
//! - `SCODER_CATALOG_CACHE_TTL_SECS` - How long fetched catalogs are reused (default: 300)
//! - `SCODER_DATA_DIR` - Directory for durable session storage (default: .scoder)
//! - `SCODER_AUTH_DELAY_MS` - Simulated login/register latency (default: 1000)
//! - `SCODER_CHECKOUT_DELAY_MS` - Simulated payment latency (default: 2000)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";
pub const DEFAULT_DATA_DIR: &str = ".scoder";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_AUTH_DELAY_MS: u64 = 1000;
const DEFAULT_CHECKOUT_DELAY_MS: u64 = 2000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog endpoint configuration
    pub catalog: CatalogConfig,
    /// Directory holding durable session storage
    pub data_dir: PathBuf,
    /// Simulated latency for login and registration
    pub auth_delay: Duration,
    /// Simulated latency for payment processing
    pub checkout_delay: Duration,
}

/// Catalog endpoint configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// URL returning the product list as a JSON array
    pub endpoint: Url,
    /// How long a fetched catalog is served from memory
    pub cache_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = parse_catalog_url(&get_env_or_default(
            &lookup,
            "SCODER_CATALOG_URL",
            DEFAULT_CATALOG_URL,
        ))?;
        let cache_ttl = Duration::from_secs(get_parsed_or_default(
            &lookup,
            "SCODER_CATALOG_CACHE_TTL_SECS",
            DEFAULT_CACHE_TTL_SECS,
        )?);
        let data_dir = PathBuf::from(get_env_or_default(
            &lookup,
            "SCODER_DATA_DIR",
            DEFAULT_DATA_DIR,
        ));
        let auth_delay = Duration::from_millis(get_parsed_or_default(
            &lookup,
            "SCODER_AUTH_DELAY_MS",
            DEFAULT_AUTH_DELAY_MS,
        )?);
        let checkout_delay = Duration::from_millis(get_parsed_or_default(
            &lookup,
            "SCODER_CHECKOUT_DELAY_MS",
            DEFAULT_CHECKOUT_DELAY_MS,
        )?);

        Ok(Self {
            catalog: CatalogConfig {
                endpoint,
                cache_ttl,
            },
            data_dir,
            auth_delay,
            checkout_delay,
        })
    }

    /// Configuration with no simulated latency.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.auth_delay = Duration::ZERO;
        self.checkout_delay = Duration::ZERO;
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_catalog_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("SCODER_CATALOG_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "SCODER_CATALOG_URL".to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    Ok(url)
}

/// Get a variable with a default value.
fn get_env_or_default(lookup: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Get a variable parsed as `T`, or `default` when unset.
fn get_parsed_or_default<T>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.catalog.endpoint.as_str(), DEFAULT_CATALOG_URL);
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.data_dir, PathBuf::from(".scoder"));
        assert_eq!(config.auth_delay, Duration::from_millis(1000));
        assert_eq!(config.checkout_delay, Duration::from_millis(2000));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SCODER_CATALOG_URL", "http://127.0.0.1:8080/products"),
            ("SCODER_CATALOG_CACHE_TTL_SECS", "0"),
            ("SCODER_DATA_DIR", "/tmp/scoder"),
            ("SCODER_AUTH_DELAY_MS", " 5 "),
            ("SCODER_CHECKOUT_DELAY_MS", "10"),
        ])
        .unwrap();

        assert_eq!(config.catalog.endpoint.port(), Some(8080));
        assert_eq!(config.catalog.cache_ttl, Duration::ZERO);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/scoder"));
        assert_eq!(config.auth_delay, Duration::from_millis(5));
        assert_eq!(config.checkout_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_catalog_url() {
        for raw in ["not a url", "ftp://example.com/products"] {
            let err = load(&[("SCODER_CATALOG_URL", raw)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SCODER_CATALOG_URL"));
        }
    }

    #[test]
    fn test_invalid_delay() {
        let err = load(&[("SCODER_AUTH_DELAY_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("SCODER_AUTH_DELAY_MS"));
    }

    #[test]
    fn test_without_delays() {
        let config = load(&[]).unwrap().without_delays();
        assert_eq!(config.auth_delay, Duration::ZERO);
        assert_eq!(config.checkout_delay, Duration::ZERO);
    }
}
