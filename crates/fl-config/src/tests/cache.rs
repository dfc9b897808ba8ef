use crate::CacheConfig;

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};

#[test]
fn given_default_cache_config_when_validate_then_ok_and_enabled() {
    let config = CacheConfig::default();

    assert_that!(config.validate(), ok(anything()));
    assert!(config.is_enabled());
}

#[test]
fn given_zero_max_cached_users_then_disabled() {
    let config = CacheConfig {
        max_cached_users: 0,
        ..Default::default()
    };

    assert!(!config.is_enabled());
}

#[test]
fn given_blank_dir_when_validate_then_error() {
    let config = CacheConfig {
        dir: "  ".into(),
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}
