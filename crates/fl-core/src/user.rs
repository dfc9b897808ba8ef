use crate::{
    AttributeValue, CustomAttributes, Environment, FIELD_CONFIG, FIELD_PRIVATE_ATTRS,
    FIELD_UPDATED_AT, FlagStore, PrivacyPolicy, Record, RecordOptions,
    UserAttribute, parse_timestamp, to_record,
};

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::{Map, Value};

/// Caller-supplied attributes for [`User::new`]. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct UserAttributes {
    pub key: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub ip_address: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub custom: Option<CustomAttributes>,
    pub is_anonymous: Option<bool>,
    pub device: Option<String>,
    pub operating_system: Option<String>,
    pub private_attributes: Option<BTreeSet<String>>,
}

/// The end user a flag evaluation or analytics event is about.
///
/// `==` compares keys only, which is what caches use to decide that two
/// values describe the same user. Use [`User::is_structurally_equal`] for an
/// attribute-by-attribute comparison.
#[derive(Debug, Clone)]
pub struct User {
    pub key: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub ip_address: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub custom: Option<CustomAttributes>,
    pub is_anonymous: bool,
    pub device: Option<String>,
    pub operating_system: Option<String>,
    pub private_attributes: Option<BTreeSet<String>>,
    pub last_updated: DateTime<Utc>,
    pub flag_store: Arc<FlagStore>,
}

impl User {
    /// Builds a fully defaulted user.
    ///
    /// - A missing or empty key becomes the environment's anonymous key.
    /// - `is_anonymous` defaults to whether the final key equals that anonymous
    ///   key, even when the caller passed a key explicitly.
    /// - `device` and `operating_system` fall back to `custom["device"]` /
    ///   `custom["os"]`, then to the environment.
    pub fn new(attributes: UserAttributes, env: &dyn Environment) -> Self {
        let default_key = env.default_key();
        let key = attributes
            .key
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| default_key.clone());
        let is_anonymous = attributes.is_anonymous.unwrap_or(key == default_key);

        let device = attributes
            .device
            .or_else(|| custom_string(attributes.custom.as_ref(), UserAttribute::Device))
            .unwrap_or_else(|| env.device_model());
        let operating_system = attributes
            .operating_system
            .or_else(|| {
                custom_string(attributes.custom.as_ref(), UserAttribute::OperatingSystem)
            })
            .unwrap_or_else(|| env.system_version());

        debug!("Constructed user {key} (anonymous: {is_anonymous})");

        Self {
            key,
            name: attributes.name,
            first_name: attributes.first_name,
            last_name: attributes.last_name,
            country: attributes.country,
            ip_address: attributes.ip_address,
            email: attributes.email,
            avatar: attributes.avatar,
            custom: attributes.custom,
            is_anonymous,
            device: Some(device),
            operating_system: Some(operating_system),
            private_attributes: attributes.private_attributes,
            last_updated: Utc::now(),
            flag_store: Arc::new(FlagStore::default()),
        }
    }

    /// Builds a user from an untyped record such as a deserialized cache entry.
    ///
    /// Returns `None` only when `record` is not a JSON object. Missing or
    /// mistyped fields fall back to defaults. Unlike [`User::new`],
    /// `is_anonymous` is `true` only when the record says so explicitly, and
    /// `device`/`operating_system` come from `custom` alone.
    pub fn from_record(record: &Value, env: &dyn Environment) -> Option<Self> {
        let Some(map) = record.as_object() else {
            warn!("User record is not an attribute map, ignoring it");
            return None;
        };

        let key = string_field(map, UserAttribute::Key.as_str())
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| env.default_key());

        let custom: Option<CustomAttributes> = map
            .get(UserAttribute::Custom.as_str())
            .and_then(Value::as_object)
            .map(|custom| {
                custom
                    .iter()
                    .map(|(name, value)| (name.clone(), AttributeValue::from(value)))
                    .collect()
            });
        let device = custom_string(custom.as_ref(), UserAttribute::Device);
        let operating_system = custom_string(custom.as_ref(), UserAttribute::OperatingSystem);

        let private_attributes = map
            .get(FIELD_PRIVATE_ATTRS)
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect::<BTreeSet<_>>()
            });

        let last_updated = map
            .get(FIELD_UPDATED_AT)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        let flag_store = map
            .get(FIELD_CONFIG)
            .and_then(Value::as_object)
            .map(FlagStore::from_cached_json)
            .unwrap_or_default();

        Some(Self {
            key,
            name: string_field(map, UserAttribute::Name.as_str()),
            first_name: string_field(map, UserAttribute::FirstName.as_str()),
            last_name: string_field(map, UserAttribute::LastName.as_str()),
            country: string_field(map, UserAttribute::Country.as_str()),
            ip_address: string_field(map, UserAttribute::Ip.as_str()),
            email: string_field(map, UserAttribute::Email.as_str()),
            avatar: string_field(map, UserAttribute::Avatar.as_str()),
            custom,
            is_anonymous: map
                .get(UserAttribute::Anonymous.as_str())
                .and_then(Value::as_bool)
                == Some(true),
            device,
            operating_system,
            private_attributes,
            last_updated,
            flag_store: Arc::new(flag_store),
        })
    }

    /// Current value of `attribute`, if set.
    pub fn value(&self, attribute: UserAttribute) -> Option<AttributeValue> {
        let string = |value: &Option<String>| value.clone().map(AttributeValue::String);
        match attribute {
            UserAttribute::Key => Some(AttributeValue::String(self.key.clone())),
            UserAttribute::Name => string(&self.name),
            UserAttribute::FirstName => string(&self.first_name),
            UserAttribute::LastName => string(&self.last_name),
            UserAttribute::Country => string(&self.country),
            UserAttribute::Ip => string(&self.ip_address),
            UserAttribute::Email => string(&self.email),
            UserAttribute::Avatar => string(&self.avatar),
            UserAttribute::Custom => self.custom.clone().map(AttributeValue::Object),
            UserAttribute::Anonymous => Some(AttributeValue::Bool(self.is_anonymous)),
            UserAttribute::Device => string(&self.device),
            UserAttribute::OperatingSystem => string(&self.operating_system),
        }
    }

    pub fn flags(&self) -> &FlagStore {
        &self.flag_store
    }

    /// Swaps in a new flag snapshot after an evaluation.
    pub fn replace_flag_store(&mut self, flag_store: FlagStore) {
        self.flag_store = Arc::new(flag_store);
    }

    /// Entries of `custom` supplied by the app, without the SDK-owned ones,
    /// in insertion order.
    pub fn user_custom(&self) -> IndexMap<&str, &AttributeValue> {
        self.custom
            .iter()
            .flatten()
            .filter(|(name, _)| !UserAttribute::is_sdk_owned_name(name))
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }

    /// Attribute-by-attribute comparison, ignoring `last_updated` and flags.
    ///
    /// `custom` is compared on its app-supplied entries, and an empty private
    /// attribute list equals an absent one, so a user equals its own reloaded
    /// cache record.
    pub fn is_structurally_equal(&self, other: &User) -> bool {
        let declared = |user: &User| user.private_attributes.clone().unwrap_or_default();

        UserAttribute::ALL
            .into_iter()
            .filter(|attribute| *attribute != UserAttribute::Custom)
            .all(|attribute| self.value(attribute) == other.value(attribute))
            && self.user_custom() == other.user_custom()
            && declared(self) == declared(other)
    }

    pub fn to_record(&self, policy: &PrivacyPolicy, options: RecordOptions) -> Record {
        to_record(self, policy, options)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for User {}

fn string_field(map: &Map<String, Value>, name: &str) -> Option<String> {
    map.get(name).and_then(Value::as_str).map(String::from)
}

fn custom_string(custom: Option<&CustomAttributes>, attribute: UserAttribute) -> Option<String> {
    custom
        .and_then(|custom| custom.get(attribute.as_str()))
        .and_then(AttributeValue::as_str)
        .map(String::from)
}
