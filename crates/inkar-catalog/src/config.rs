//! Catalog configuration.
//!
//! Env-var driven, with the same conventions as the rest of the stack:
//! empty/whitespace values are treated as unset, parse failures are
//! `Error::InvalidInput`, and out-of-range values are rejected at load
//! time so the browsing code never sees a zero page size.

use std::time::Duration;

use inkar_core::{Error, Result};

const MIN_PAGE_SIZE: usize = 1;
const MAX_PAGE_SIZE: usize = 100;

fn default_page_size() -> usize {
    10
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_image_cache_capacity() -> usize {
    64
}

fn default_tattoo_collection() -> String {
    "tattoometa".to_string()
}

fn default_user_collection() -> String {
    "users".to_string()
}

/// Configuration for the InkAR catalog.
#[derive(Debug, Clone)]
pub struct Config {
    /// Items per page in the browsing list.
    pub page_size: usize,

    /// Deadline for any single remote fetch (collection query,
    /// document read, image fetch), in seconds.
    pub fetch_timeout_secs: u64,

    /// Capacity of the content-addressed image cache (entries).
    pub image_cache_capacity: usize,

    /// Document collection holding tattoo metadata records.
    pub tattoo_collection: String,

    /// Document collection holding artist profile records.
    pub user_collection: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            image_cache_capacity: default_image_cache_capacity(),
            tattoo_collection: default_tattoo_collection(),
            user_collection: default_user_collection(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Supported env vars:
    /// - `INKAR_PAGE_SIZE` (1-100, default: 10)
    /// - `INKAR_FETCH_TIMEOUT_SECS` (>= 1, default: 30)
    /// - `INKAR_IMAGE_CACHE_CAPACITY` (>= 1, default: 64)
    /// - `INKAR_TATTOO_COLLECTION` (default: `tattoometa`)
    /// - `INKAR_USER_COLLECTION` (default: `users`)
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but cannot be
    /// parsed, or is out of range.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(size) = env_usize("INKAR_PAGE_SIZE")? {
            config.page_size = size;
        }
        if let Some(secs) = env_u64("INKAR_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout_secs = secs;
        }
        if let Some(capacity) = env_usize("INKAR_IMAGE_CACHE_CAPACITY")? {
            config.image_cache_capacity = capacity;
        }
        if let Some(collection) = env_string("INKAR_TATTOO_COLLECTION") {
            config.tattoo_collection = collection;
        }
        if let Some(collection) = env_string("INKAR_USER_COLLECTION") {
            config.user_collection = collection;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` when any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.page_size < MIN_PAGE_SIZE || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidInput(format!(
                "INKAR_PAGE_SIZE must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE} (got {})",
                self.page_size
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(Error::InvalidInput(
                "INKAR_FETCH_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        if self.image_cache_capacity == 0 {
            return Err(Error::InvalidInput(
                "INKAR_IMAGE_CACHE_CAPACITY must be greater than 0".to_string(),
            ));
        }
        if self.tattoo_collection.is_empty() {
            return Err(Error::InvalidInput(
                "INKAR_TATTOO_COLLECTION cannot be empty".to_string(),
            ));
        }
        if self.user_collection.is_empty() {
            return Err(Error::InvalidInput(
                "INKAR_USER_COLLECTION cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the fetch timeout as a `Duration`.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    let Some(v) = env_string(name) else {
        return Ok(None);
    };
    v.parse::<u64>()
        .map(Some)
        .map_err(|e| Error::InvalidInput(format!("{name} must be a u64: {e}")))
}

fn env_usize(name: &str) -> Result<Option<usize>> {
    let Some(v) = env_string(name) else {
        return Ok(None);
    };
    v.parse::<usize>()
        .map(Some)
        .map_err(|e| Error::InvalidInput(format!("{name} must be a usize: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.tattoo_collection, "tattoometa");
    }

    #[test]
    fn zero_page_size_rejected() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn oversized_page_rejected() {
        let config = Config {
            page_size: 1000,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = Config {
            fetch_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_cache_capacity_rejected() {
        let config = Config {
            image_cache_capacity: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_collection_rejected() {
        let config = Config {
            tattoo_collection: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
