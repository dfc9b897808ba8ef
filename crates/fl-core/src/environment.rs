use crate::{ANONYMOUS_KEY_STORAGE_NAME, CoreError, CoreResult};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use log::{info, warn};
use uuid::Uuid;

/// Host capability supplying install-scoped identity and device details.
pub trait Environment: Send + Sync {
    /// Stable anonymous key for this install.
    fn default_key(&self) -> String;

    fn device_model(&self) -> String;

    fn system_version(&self) -> String;
}

/// Minimal string persistence, keyed by name.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&self, name: &str, value: &str) -> CoreResult<()>;

    /// Returns the non-empty value stored under `name`, or stores `make()` and
    /// returns it. The read and the write are one atomic step for every
    /// handle on the same underlying storage.
    fn get_or_insert_with(&self, name: &str, make: &dyn Fn() -> String) -> CoreResult<String>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) -> CoreResult<()> {
        (**self).set(name, value)
    }

    fn get_or_insert_with(&self, name: &str, make: &dyn Fn() -> String) -> CoreResult<String> {
        (**self).get_or_insert_with(name, make)
    }
}

/// In-memory key-value store. Contents last for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> CoreResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| CoreError::storage(name, "memory store lock poisoned"))?;
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn get_or_insert_with(&self, name: &str, make: &dyn Fn() -> String) -> CoreResult<String> {
        let mut values = self
            .values
            .write()
            .map_err(|_| CoreError::storage(name, "memory store lock poisoned"))?;

        match values.get(name).filter(|value| !value.is_empty()) {
            Some(existing) => Ok(existing.clone()),
            None => {
                let value = make();
                values.insert(name.to_string(), value.clone());
                Ok(value)
            }
        }
    }
}

/// Environment backed by a key-value store for the anonymous key and fixed
/// device strings supplied by the host.
pub struct InstallEnvironment<S: KeyValueStore> {
    store: S,
    device_model: String,
    system_version: String,
    anonymous_key: Mutex<Option<String>>,
}

impl<S: KeyValueStore> InstallEnvironment<S> {
    pub fn new(
        store: S,
        device_model: impl Into<String>,
        system_version: impl Into<String>,
    ) -> Self {
        Self {
            store,
            device_model: device_model.into(),
            system_version: system_version.into(),
            anonymous_key: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the stored key, or stores a fresh one. The store decides the
    /// winner, so environments sharing storage agree on a single key.
    fn load_or_create_key(&self) -> String {
        let candidate = Uuid::new_v4().to_string();

        match self
            .store
            .get_or_insert_with(ANONYMOUS_KEY_STORAGE_NAME, &|| candidate.clone())
        {
            Ok(key) => {
                if key == candidate {
                    info!("Generated anonymous user key for this install");
                }
                key
            }
            Err(e) => {
                warn!("Anonymous user key not persisted, it will change next launch: {e}");
                candidate
            }
        }
    }
}

impl<S: KeyValueStore> Environment for InstallEnvironment<S> {
    fn default_key(&self) -> String {
        let mut cached = match self.anonymous_key.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(key) = cached.as_ref() {
            return key.clone();
        }

        let key = self.load_or_create_key();
        *cached = Some(key.clone());
        key
    }

    fn device_model(&self) -> String {
        self.device_model.clone()
    }

    fn system_version(&self) -> String {
        self.system_version.clone()
    }
}
