mod error;

use fl_core::{Environment, User, UserAttributes};

use chrono::{Duration, Utc};

pub(crate) const ANONYMOUS_KEY: &str = "anon-install-key";

/// Environment with fixed answers.
pub(crate) struct FixedEnvironment;

impl Environment for FixedEnvironment {
    fn default_key(&self) -> String {
        ANONYMOUS_KEY.to_string()
    }

    fn device_model(&self) -> String {
        "Pixel 8".to_string()
    }

    fn system_version(&self) -> String {
        "14.2".to_string()
    }
}

/// User last updated `minutes_ago` minutes in the past.
pub(crate) fn user_at(key: &str, minutes_ago: i64) -> User {
    let mut user = User::new(
        UserAttributes {
            key: Some(key.into()),
            email: Some(format!("{key}@example.com")),
            ..Default::default()
        },
        &FixedEnvironment,
    );
    user.last_updated = Utc::now() - Duration::minutes(minutes_ago);
    user
}
