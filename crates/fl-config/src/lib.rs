mod cache_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod privacy_config;

#[cfg(test)]
mod tests;

pub use cache_config::CacheConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use privacy_config::PrivacyConfig;

const CONFIG_DIR_ENV_VAR: &str = "FL_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".flagline";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_ALL_ATTRIBUTES_PRIVATE: bool = false;
const DEFAULT_CACHE_DIRECTORY: &str = "cache";
const DEFAULT_MAX_CACHED_USERS: usize = 5;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;
