use crate::{ConfigError, ConfigErrorResult, DEFAULT_ALL_ATTRIBUTES_PRIVATE};

use fl_core::{PrivacyPolicy, UserAttribute};

use std::str::FromStr;

use log::warn;
use serde::Deserialize;

/// Global attribute privacy applied to every user.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    pub all_attributes_private: bool,
    /// Attribute names, or keys inside `custom`, to redact for every user.
    pub private_attribute_names: Vec<String>,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            all_attributes_private: DEFAULT_ALL_ATTRIBUTES_PRIVATE,
            private_attribute_names: Vec::new(),
        }
    }
}

impl PrivacyConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(index) = self
            .private_attribute_names
            .iter()
            .position(|name| name.trim().is_empty())
        {
            return Err(ConfigError::privacy(format!(
                "privacy.private_attribute_names[{index}] must not be empty"
            )));
        }

        // Names of built-in attributes that can never be redacted are legal but inert.
        for name in &self.private_attribute_names {
            if let Ok(attribute) = UserAttribute::from_str(name)
                && !attribute.is_privatizable()
            {
                warn!("privacy.private_attribute_names: '{name}' is never redacted");
            }
        }

        Ok(())
    }

    pub fn to_policy(&self) -> PrivacyPolicy {
        PrivacyPolicy::new(
            self.all_attributes_private,
            self.private_attribute_names.iter().cloned(),
        )
    }
}
