use crate::{
    FIELD_CONFIG, FIELD_PRIVATE_ATTRS, FIELD_UPDATED_AT, PrivacyPolicy, User, UserAttribute,
    format_timestamp,
};

use std::collections::BTreeSet;

use log::debug;
use serde_json::{Map, Value};

/// Ordered wire/cache representation of a user.
pub type Record = Map<String, Value>;

/// What [`to_record`] includes besides the always-present attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOptions {
    /// Emit the flag snapshot under `config`.
    pub include_flags: bool,
    /// Emit values of private attributes instead of redacting them.
    pub include_private_values: bool,
}

impl RecordOptions {
    /// Records attached to analytics events.
    pub const EVENT: Self = Self {
        include_flags: false,
        include_private_values: false,
    };

    /// Records kept in the local user cache.
    pub const CACHE: Self = Self {
        include_flags: true,
        include_private_values: true,
    };
}

/// Serializes `user` under `policy`.
///
/// Fields are emitted in the order `key, name, firstName, lastName, country,
/// ip, email, avatar, custom, anonymous, updatedAt, privateAttrs, config`.
/// Redacted attributes are left out and their names listed, sorted, under
/// `privateAttrs`. `device` and `os` are always written into `custom`.
pub fn to_record(user: &User, policy: &PrivacyPolicy, options: RecordOptions) -> Record {
    let private_set = policy.effective_private_set(user);
    let is_redacted =
        |name: &str| !options.include_private_values && private_set.contains(name);
    let mut redacted = BTreeSet::new();

    let mut record = Map::new();
    record.insert(
        UserAttribute::Key.as_str().to_string(),
        Value::String(user.key.clone()),
    );

    for (attribute, accessor) in UserAttribute::PRIVATIZABLE_SCALARS {
        let Some(value) = accessor(user) else {
            continue;
        };
        let name = attribute.as_str();
        if is_redacted(name) {
            redacted.insert(name.to_string());
        } else {
            record.insert(name.to_string(), Value::String(value.to_string()));
        }
    }

    let custom = custom_record(user, &is_redacted, &mut redacted);
    if !custom.is_empty() {
        record.insert(
            UserAttribute::Custom.as_str().to_string(),
            Value::Object(custom),
        );
    }

    record.insert(
        UserAttribute::Anonymous.as_str().to_string(),
        Value::Bool(user.is_anonymous),
    );
    record.insert(
        FIELD_UPDATED_AT.to_string(),
        Value::String(format_timestamp(&user.last_updated)),
    );

    if options.include_private_values {
        // Declared names, not redacted ones.
        if let Some(declared) = user.private_attributes.as_ref().filter(|d| !d.is_empty()) {
            record.insert(FIELD_PRIVATE_ATTRS.to_string(), string_list(declared));
        }
    } else if !redacted.is_empty() {
        record.insert(FIELD_PRIVATE_ATTRS.to_string(), string_list(&redacted));
    }

    if options.include_flags {
        record.insert(
            FIELD_CONFIG.to_string(),
            Value::Object(user.flag_store.to_json()),
        );
    }

    debug!(
        "Serialized user {} ({} attributes redacted)",
        user.key,
        redacted.len()
    );

    record
}

/// Builds the inner `custom` map, redacting either the whole user-supplied
/// portion or individual keys, then writes the SDK-owned entries.
fn custom_record(
    user: &User,
    is_redacted: &dyn Fn(&str) -> bool,
    redacted: &mut BTreeSet<String>,
) -> Map<String, Value> {
    let mut custom = Map::new();

    let user_entries = user.user_custom();

    if is_redacted(UserAttribute::Custom.as_str()) && !user_entries.is_empty() {
        redacted.insert(UserAttribute::Custom.as_str().to_string());
    } else {
        for (name, value) in user_entries {
            if is_redacted(name) && !value.is_null() {
                redacted.insert(name.to_string());
            } else {
                custom.insert(name.to_string(), value.to_json());
            }
        }
    }

    if let Some(device) = &user.device {
        custom.insert(
            UserAttribute::Device.as_str().to_string(),
            Value::String(device.clone()),
        );
    }
    if let Some(operating_system) = &user.operating_system {
        custom.insert(
            UserAttribute::OperatingSystem.as_str().to_string(),
            Value::String(operating_system.clone()),
        );
    }

    custom
}

fn string_list(names: &BTreeSet<String>) -> Value {
    Value::Array(names.iter().cloned().map(Value::String).collect())
}
