use crate::{AttributeValue, FlagSource, FlagStore};

use serde_json::json;

#[test]
fn given_bare_values_when_new_then_kept_as_is() {
    let raw = json!({"dark-mode": true, "banner": "spring"});

    let store = FlagStore::new(raw.as_object().unwrap(), FlagSource::Evaluation);

    assert_eq!(store.flag("dark-mode"), Some(&AttributeValue::from(true)));
    assert_eq!(store.flag("banner"), Some(&AttributeValue::from("spring")));
    assert_eq!(store.source(), FlagSource::Evaluation);
}

#[test]
fn given_full_flag_objects_when_new_then_flattened_to_value() {
    let raw = json!({
        "dark-mode": {"value": true, "version": 4, "variation": 1},
        "limits": {"value": {"max": 3}, "flagVersion": 9}
    });

    let store = FlagStore::new(raw.as_object().unwrap(), FlagSource::Cache);

    assert_eq!(store.flag("dark-mode"), Some(&AttributeValue::from(true)));
    assert_eq!(
        store.flag("limits"),
        Some(&AttributeValue::from(json!({"max": 3})))
    );
    assert_eq!(store.source(), FlagSource::Cache);
}

#[test]
fn given_object_flag_with_unknown_keys_when_new_then_not_flattened() {
    let raw = json!({"layout": {"value": "grid", "columns": 3}});

    let store = FlagStore::new(raw.as_object().unwrap(), FlagSource::Cache);

    assert_eq!(
        store.flag("layout"),
        Some(&AttributeValue::from(json!({"value": "grid", "columns": 3})))
    );
}

#[test]
fn given_store_when_to_json_then_flat_value_map() {
    let raw = json!({"a": {"value": 1, "version": 2}, "b": "x"});
    let store = FlagStore::new(raw.as_object().unwrap(), FlagSource::Cache);

    let json = store.to_json();

    assert_eq!(serde_json::Value::Object(json), json!({"a": 1, "b": "x"}));
}

#[test]
fn given_default_store_then_empty() {
    let store = FlagStore::default();

    assert!(store.is_empty());
    assert!(store.current_flags().is_empty());
}

#[test]
fn given_cached_object_value_when_from_cached_json_then_not_flattened() {
    let raw = json!({"cfg": {"value": 5, "version": 2}, "on": true});

    let store = FlagStore::from_cached_json(raw.as_object().unwrap());

    assert_eq!(
        store.flag("cfg").map(AttributeValue::to_json),
        Some(json!({"value": 5, "version": 2}))
    );
    assert_eq!(store.flag("on"), Some(&AttributeValue::from(true)));
    assert_eq!(store.source(), FlagSource::Cache);
}
