use crate::tests::{FixedEnvironment, full_user};
use crate::{PrivacyPolicy, User, UserAttributes};

use std::collections::BTreeSet;

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn given_all_private_when_effective_set_then_every_privatizable_name() {
    let user = full_user();

    let set = PrivacyPolicy::all_private().effective_private_set(&user);

    assert_eq!(
        set,
        names(&["avatar", "country", "custom", "email", "firstName", "ip", "lastName", "name"])
    );
}

#[test]
fn given_all_private_and_user_list_when_effective_set_then_user_list_ignored() {
    let user = User::new(
        UserAttributes {
            private_attributes: Some(names(&["score"])),
            ..Default::default()
        },
        &FixedEnvironment,
    );

    let set = PrivacyPolicy::all_private().effective_private_set(&user);

    assert!(!set.contains("score"));
}

#[test]
fn given_user_and_global_lists_when_effective_set_then_union() {
    let user = User::new(
        UserAttributes {
            private_attributes: Some(names(&["email", "score"])),
            ..Default::default()
        },
        &FixedEnvironment,
    );
    let policy = PrivacyPolicy::new(false, ["email", "country"]);

    let set = policy.effective_private_set(&user);

    assert_eq!(set, names(&["country", "email", "score"]));
}

#[test]
fn given_no_declarations_when_effective_set_then_empty() {
    let set = PrivacyPolicy::default().effective_private_set(&full_user());

    assert!(set.is_empty());
}

#[test]
fn given_differently_cased_name_when_effective_set_then_kept_verbatim() {
    let policy = PrivacyPolicy::new(false, ["Email"]);

    let set = policy.effective_private_set(&full_user());

    assert!(set.contains("Email"));
    assert!(!set.contains("email"));
}

#[test]
fn given_sdk_owned_names_declared_when_effective_set_then_excluded() {
    // Given
    let user = User::new(
        UserAttributes {
            private_attributes: Some(names(&["device", "email"])),
            ..Default::default()
        },
        &FixedEnvironment,
    );
    let policy = PrivacyPolicy::new(false, ["os", "score"]);

    // When
    let set = policy.effective_private_set(&user);

    // Then
    assert_eq!(set, names(&["email", "score"]));
}
