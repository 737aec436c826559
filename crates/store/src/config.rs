//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BASKET_STORAGE_KEY` - Name of the persistence slot (default: `my-cart`)
//! - `BASKET_STORAGE_DIR` - Directory backing [`FileStorage`](crate::FileStorage)

use std::path::PathBuf;

use thiserror::Error;

/// Default persistence slot name.
pub const DEFAULT_STORAGE_KEY: &str = "my-cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key of the slot the cart is mirrored to
    pub storage_key: String,
    /// Directory for file-backed storage, when running outside a browser
    pub storage_dir: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BASKET_STORAGE_KEY` is set but blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_key = match lookup("BASKET_STORAGE_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "BASKET_STORAGE_KEY".to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Some(key) => key,
            None => DEFAULT_STORAGE_KEY.to_string(),
        };
        let storage_dir = lookup("BASKET_STORAGE_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            storage_key,
            storage_dir,
        })
    }

    /// Override the storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
