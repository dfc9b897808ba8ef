mod flag_store;
mod migration;
mod redaction;

use crate::{CustomAttributes, Environment, User, UserAttributes};

pub(crate) const ANONYMOUS_KEY: &str = "anon-install-key";
pub(crate) const DEVICE_MODEL: &str = "Pixel 8";
pub(crate) const SYSTEM_VERSION: &str = "14.2";

/// Environment with fixed answers.
pub(crate) struct FixedEnvironment;

impl Environment for FixedEnvironment {
    fn default_key(&self) -> String {
        ANONYMOUS_KEY.to_string()
    }

    fn device_model(&self) -> String {
        DEVICE_MODEL.to_string()
    }

    fn system_version(&self) -> String {
        SYSTEM_VERSION.to_string()
    }
}

pub(crate) fn custom(entries: &[(&str, crate::AttributeValue)]) -> CustomAttributes {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// User with every scalar set.
pub(crate) fn full_user() -> User {
    User::new(
        UserAttributes {
            key: Some("user-42".into()),
            name: Some("Ada Lovelace".into()),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            country: Some("GB".into()),
            ip_address: Some("10.0.0.7".into()),
            email: Some("ada@example.com".into()),
            avatar: Some("https://example.com/ada.png".into()),
            custom: Some(custom(&[("score", 99i64.into()), ("plan", "pro".into())])),
            ..Default::default()
        },
        &FixedEnvironment,
    )
}
