use crate::{
    Environment, FIELD_CONFIG, FlagSource, FlagStore, LEGACY_FLAGS_WRAPPER_KEY, User,
};

use log::{debug, info};
use serde_json::{Map, Value};

/// Layout of a persisted user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSchema {
    /// Flags nested one level down under the legacy wrapper key in `config`.
    Legacy,
    /// Flags stored directly under `config`.
    Current,
}

impl CacheSchema {
    pub fn detect(record: &Value) -> Self {
        let wrapped = record
            .get(FIELD_CONFIG)
            .and_then(Value::as_object)
            .is_some_and(|config| config.contains_key(LEGACY_FLAGS_WRAPPER_KEY));

        if wrapped { Self::Legacy } else { Self::Current }
    }
}

/// Reads a legacy cache record, unwrapping its flags from the wrapper key.
///
/// Attributes go through [`User::from_record`]; the flag snapshot it built
/// from the wrapped `config` is then replaced with the unwrapped flags.
pub fn migrate_legacy_record(record: &Value, env: &dyn Environment) -> Option<User> {
    let mut user = User::from_record(record, env)?;

    let empty = Map::new();
    let flags = record
        .get(FIELD_CONFIG)
        .and_then(|config| config.get(LEGACY_FLAGS_WRAPPER_KEY))
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    user.replace_flag_store(FlagStore::new(flags, FlagSource::Cache));
    info!(
        "Migrated legacy cache record for user {} ({} flags)",
        user.key,
        flags.len()
    );

    Some(user)
}

/// Loads a persisted record of either layout.
pub fn load_cached_user(record: &Value, env: &dyn Environment) -> Option<User> {
    match CacheSchema::detect(record) {
        CacheSchema::Legacy => migrate_legacy_record(record, env),
        CacheSchema::Current => {
            debug!("Loading current-layout cache record");
            User::from_record(record, env)
        }
    }
}
