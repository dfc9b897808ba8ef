use crate::{User, UserAttribute};

use std::collections::BTreeSet;

/// Global privacy settings combined with each user's own private attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivacyPolicy {
    pub all_attributes_private: bool,
    pub private_attribute_names: BTreeSet<String>,
}

impl PrivacyPolicy {
    pub fn new<I, S>(all_attributes_private: bool, private_attribute_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all_attributes_private,
            private_attribute_names: private_attribute_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy that redacts every privatizable attribute.
    pub fn all_private() -> Self {
        Self {
            all_attributes_private: true,
            private_attribute_names: BTreeSet::new(),
        }
    }

    /// Names that must be redacted for `user`.
    ///
    /// Every privatizable name when all attributes are private, otherwise the
    /// union of the user's list and the global list. SDK-owned names are
    /// never part of the set.
    pub fn effective_private_set(&self, user: &User) -> BTreeSet<String> {
        if self.all_attributes_private {
            return UserAttribute::privatizable_names().map(String::from).collect();
        }

        user.private_attributes
            .iter()
            .flatten()
            .chain(self.private_attribute_names.iter())
            .filter(|name| !UserAttribute::is_sdk_owned_name(name))
            .cloned()
            .collect()
    }
}
