use crate::tests::{ANONYMOUS_KEY, FixedEnvironment};
use crate::{
    AttributeValue, CacheSchema, FlagSource, LEGACY_FLAGS_WRAPPER_KEY, load_cached_user,
    migrate_legacy_record,
};

use googletest::assert_that;
use googletest::prelude::eq;
use serde_json::json;

fn legacy_record() -> serde_json::Value {
    json!({
        "key": "legacy-user",
        "name": "Old Timer",
        "email": "old@example.com",
        "custom": {"device": "iPad", "os": "9.3", "level": 3},
        "anonymous": false,
        "updatedAt": "2017-06-01T12:00:00.000Z",
        "config": {
            LEGACY_FLAGS_WRAPPER_KEY: {
                "new-nav": {"value": true, "version": 7},
                "greeting": "hello"
            }
        }
    })
}

#[test]
fn given_wrapped_config_when_detect_then_legacy() {
    assert_eq!(CacheSchema::detect(&legacy_record()), CacheSchema::Legacy);
}

#[test]
fn given_flat_config_or_no_config_when_detect_then_current() {
    assert_eq!(
        CacheSchema::detect(&json!({"key": "k", "config": {"f": 1}})),
        CacheSchema::Current
    );
    assert_eq!(CacheSchema::detect(&json!({"key": "k"})), CacheSchema::Current);
    assert_eq!(CacheSchema::detect(&json!(42)), CacheSchema::Current);
}

#[test]
fn given_legacy_record_when_migrated_then_flags_unwrapped() {
    // When
    let user = migrate_legacy_record(&legacy_record(), &FixedEnvironment).unwrap();

    // Then
    let flags = user.flags();
    assert_that!(flags.current_flags().len(), eq(2));
    assert_eq!(flags.flag("new-nav"), Some(&AttributeValue::from(true)));
    assert_eq!(flags.flag("greeting"), Some(&AttributeValue::from("hello")));
    assert!(flags.flag(LEGACY_FLAGS_WRAPPER_KEY).is_none());
    assert_eq!(flags.source(), FlagSource::Cache);
}

#[test]
fn given_legacy_record_when_migrated_then_attributes_read() {
    let user = migrate_legacy_record(&legacy_record(), &FixedEnvironment).unwrap();

    assert_that!(user.key.as_str(), eq("legacy-user"));
    assert_eq!(user.name.as_deref(), Some("Old Timer"));
    assert_eq!(user.email.as_deref(), Some("old@example.com"));
    assert_eq!(user.device.as_deref(), Some("iPad"));
    assert_eq!(user.operating_system.as_deref(), Some("9.3"));
    assert_eq!(
        crate::format_timestamp(&user.last_updated),
        "2017-06-01T12:00:00.000Z"
    );
}

#[test]
fn given_legacy_record_with_bad_wrapper_when_migrated_then_empty_flags() {
    let record = json!({"key": "k", "config": {LEGACY_FLAGS_WRAPPER_KEY: "oops"}});

    let user = migrate_legacy_record(&record, &FixedEnvironment).unwrap();

    assert!(user.flags().is_empty());
}

#[test]
fn given_non_object_when_migrated_then_none() {
    assert!(migrate_legacy_record(&json!("legacy"), &FixedEnvironment).is_none());
}

#[test]
fn given_either_layout_when_load_cached_user_then_same_flags() {
    let current = json!({"key": "k", "config": {"new-nav": true, "greeting": "hello"}});

    let from_legacy = load_cached_user(&legacy_record(), &FixedEnvironment).unwrap();
    let from_current = load_cached_user(&current, &FixedEnvironment).unwrap();

    assert_eq!(from_legacy.flags().current_flags(), from_current.flags().current_flags());
}

#[test]
fn given_record_without_key_when_load_cached_user_then_environment_key() {
    let user = load_cached_user(&json!({"name": "n"}), &FixedEnvironment).unwrap();

    assert_that!(user.key.as_str(), eq(ANONYMOUS_KEY));
}
