use crate::{ConfigError, ConfigErrorResult, DEFAULT_CACHE_DIRECTORY, DEFAULT_MAX_CACHED_USERS};

use std::path::Path;

use serde::Deserialize;

/// Where persisted users and the anonymous key live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Relative to the config directory.
    pub dir: String,
    /// `0` turns the user cache off.
    pub max_cached_users: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: String::from(DEFAULT_CACHE_DIRECTORY),
            max_cached_users: DEFAULT_MAX_CACHED_USERS,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.dir.trim().is_empty() {
            return Err(ConfigError::cache("cache.dir must not be empty"));
        }

        if Path::new(&self.dir).is_absolute() || self.dir.contains("..") {
            return Err(ConfigError::cache(
                "cache.dir must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.max_cached_users > 0
    }
}
