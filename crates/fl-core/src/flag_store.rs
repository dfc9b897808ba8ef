use crate::AttributeValue;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flattened flag values keyed by flag key.
pub type FlagValues = BTreeMap<String, AttributeValue>;

/// Keys that may accompany `value` in a full flag representation.
const FLAG_METADATA_KEYS: [&str; 8] = [
    "version",
    "flagVersion",
    "variation",
    "trackEvents",
    "trackReason",
    "debugEventsUntilDate",
    "reason",
    "prerequisites",
];

const FLAG_VALUE_KEY: &str = "value";

/// Where a flag snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    #[default]
    Evaluation,
    Cache,
}

/// Point-in-time copy of evaluated flag values for one user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlagStore {
    flags: FlagValues,
    source: FlagSource,
}

impl FlagStore {
    /// Builds a snapshot from a raw flag map, flattening full flag objects
    /// down to their `value`.
    pub fn new(raw: &Map<String, Value>, source: FlagSource) -> Self {
        let flags = raw
            .iter()
            .map(|(key, value)| (key.clone(), flatten_flag(value)))
            .collect();
        Self { flags, source }
    }

    /// Rehydrates a snapshot previously written by [`FlagStore::to_json`].
    ///
    /// Values are taken verbatim: they were flattened before being written,
    /// so an object-valued flag must not be unwrapped a second time.
    pub fn from_cached_json(raw: &Map<String, Value>) -> Self {
        let flags = raw
            .iter()
            .map(|(key, value)| (key.clone(), AttributeValue::from(value)))
            .collect();
        Self {
            flags,
            source: FlagSource::Cache,
        }
    }

    pub fn from_values(flags: FlagValues, source: FlagSource) -> Self {
        Self { flags, source }
    }

    pub fn current_flags(&self) -> &FlagValues {
        &self.flags
    }

    pub fn flag(&self, key: &str) -> Option<&AttributeValue> {
        self.flags.get(key)
    }

    pub fn source(&self) -> FlagSource {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flag values as a JSON object, as emitted under `config`.
    pub fn to_json(&self) -> Map<String, Value> {
        self.flags
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }
}

fn flatten_flag(value: &Value) -> AttributeValue {
    match value {
        Value::Object(map) if is_full_flag(map) => map
            .get(FLAG_VALUE_KEY)
            .map(AttributeValue::from)
            .unwrap_or_default(),
        other => AttributeValue::from(other),
    }
}

fn is_full_flag(map: &Map<String, Value>) -> bool {
    map.contains_key(FLAG_VALUE_KEY)
        && map
            .keys()
            .all(|key| key == FLAG_VALUE_KEY || FLAG_METADATA_KEYS.contains(&key.as_str()))
}
