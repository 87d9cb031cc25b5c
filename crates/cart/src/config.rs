//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Storage slot holding the cart (default: `@marketPlace:cart`)
//! - `CART_STORAGE_DIR` - Directory for file-backed storage (default: `.cart`)

use std::path::PathBuf;

use thiserror::Error;

/// Slot key the mobile app has always used for the cart.
pub const DEFAULT_STORAGE_KEY: &str = "@marketPlace:cart";

/// Default directory for [`FileStorage`](crate::storage::FileStorage).
pub const DEFAULT_STORAGE_DIR: &str = ".cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but its value is unusable (name, reason).
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Storage slot the cart is persisted under
    pub storage_key: String,
    /// Directory used by the file storage backend
    pub storage_dir: PathBuf,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
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
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `CART_STORAGE_KEY` or
    /// `CART_STORAGE_DIR` is set but blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_key = get_non_empty(&lookup, "CART_STORAGE_KEY", DEFAULT_STORAGE_KEY)?;
        let storage_dir =
            PathBuf::from(get_non_empty(&lookup, "CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)?);

        Ok(Self {
            storage_key,
            storage_dir,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value, rejecting blank overrides.
fn get_non_empty<F>(lookup: &F, key: &str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        )),
        Some(value) => Ok(value),
        None => Ok(default.to_string()),
    }
}
