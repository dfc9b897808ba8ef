//! User identity model for the flagline feature-flag SDK.
//!
//! Builds the end-user context sent with every flag evaluation and analytics
//! event, redacts private attributes, and reads persisted cache records in
//! both the current and the legacy layout.

mod attribute;
mod environment;
mod error;
mod flag_store;
mod migration;
mod record;
mod redaction;
mod timestamp;
mod user;
mod value;

#[cfg(test)]
mod tests;

pub use attribute::{ScalarAccessor, UserAttribute};
pub use environment::{Environment, InstallEnvironment, KeyValueStore, MemoryKeyValueStore};
pub use error::{CoreError, CoreResult};
pub use flag_store::{FlagSource, FlagStore, FlagValues};
pub use migration::{CacheSchema, load_cached_user, migrate_legacy_record};
pub use record::{Record, RecordOptions, to_record};
pub use redaction::PrivacyPolicy;
pub use timestamp::{canonicalize, format_timestamp, parse_timestamp};
pub use user::{User, UserAttributes};
pub use value::{AttributeValue, CustomAttributes};

/// Storage name under which the per-install anonymous key is persisted.
pub const ANONYMOUS_KEY_STORAGE_NAME: &str = "anonymousUserKey";

/// Wrapper key that nests the flag map inside `config` in legacy cache records.
pub const LEGACY_FLAGS_WRAPPER_KEY: &str = "featuresJsonDictionary";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const FIELD_UPDATED_AT: &str = "updatedAt";
const FIELD_PRIVATE_ATTRS: &str = "privateAttrs";
const FIELD_CONFIG: &str = "config";
