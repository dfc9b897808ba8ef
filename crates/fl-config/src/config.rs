use crate::{
    CONFIG_DIR_ENV_VAR, CONFIG_FILENAME, CacheConfig, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, LoggingConfig, PrivacyConfig,
};

use fl_core::PrivacyPolicy;

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub privacy: PrivacyConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for FL_CONFIG_DIR env var, else use ./.flagline/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply FL_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: FL_CONFIG_DIR env var > ./.flagline/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.privacy.validate()?;
        self.cache.validate()?;
        Ok(())
    }

    /// Absolute path of the cache directory.
    pub fn cache_dir(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.cache.dir))
    }

    pub fn privacy_policy(&self) -> PrivacyPolicy {
        self.privacy.to_policy()
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  privacy: all_private={}, private_attributes={:?}",
            self.privacy.all_attributes_private, self.privacy.private_attribute_names
        );
        info!(
            "  cache: dir={}, max_cached_users={}",
            self.cache.dir, self.cache.max_cached_users
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Privacy
        Self::apply_env_bool(
            "FL_ALL_ATTRIBUTES_PRIVATE",
            &mut self.privacy.all_attributes_private,
        );
        Self::apply_env_list(
            "FL_PRIVATE_ATTRIBUTE_NAMES",
            &mut self.privacy.private_attribute_names,
        );

        // Cache
        Self::apply_env_string("FL_CACHE_DIR", &mut self.cache.dir);
        Self::apply_env_parse("FL_MAX_CACHED_USERS", &mut self.cache.max_cached_users);

        // Logging
        Self::apply_env_parse("FL_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("FL_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("FL_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }

    /// Helper: Apply environment variable override for comma-separated lists
    fn apply_env_list(var_name: &str, target: &mut Vec<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect();
        }
    }
}
