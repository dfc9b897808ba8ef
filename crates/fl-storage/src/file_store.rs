use crate::atomic_file::{FileLock, backup_corrupted, read_if_exists, write_atomic};
use crate::{SETTINGS_FILENAME, StorageError, StorageResult};

use fl_core::{CoreError, CoreResult, KeyValueStore};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Key-value settings persisted as a JSON object in `settings.json`.
///
/// Every handle on the same directory, in this process or another, updates
/// the file under one lock, so `get_or_insert_with` is a true
/// compare-and-set.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SETTINGS_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        let Some(contents) = read_if_exists(&self.path)? else {
            return Ok(BTreeMap::new());
        };

        serde_json::from_str(&contents)
            .map_err(|e| StorageError::corrupted(&self.path, e.to_string()))
    }

    /// Current contents; a corrupted file is backed up and treated as empty.
    fn read_or_reset(&self) -> StorageResult<BTreeMap<String, String>> {
        match self.read_all() {
            Err(StorageError::Corrupted { message, .. }) => {
                warn!("Settings file {:?} corrupted: {message}", self.path);
                backup_corrupted(&self.path)?;
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    /// Applies `update` to the stored map while holding the file lock.
    /// `update` returns its result and whether the map changed.
    fn modify<T>(
        &self,
        update: impl FnOnce(&mut BTreeMap<String, String>) -> (T, bool),
    ) -> StorageResult<T> {
        let _lock = FileLock::exclusive(&self.path)?;

        let mut values = self.read_or_reset()?;
        let (result, changed) = update(&mut values);
        if changed {
            let json = serde_json::to_string_pretty(&values)?;
            write_atomic(&self.path, json.as_bytes())?;
        }
        Ok(result)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, name: &str) -> Option<String> {
        match self.read_all() {
            Ok(values) => values.get(name).cloned(),
            Err(e) => {
                warn!("Unable to read setting '{name}': {e}");
                None
            }
        }
    }

    fn set(&self, name: &str, value: &str) -> CoreResult<()> {
        self.modify(|values| {
            values.insert(name.to_string(), value.to_string());
            ((), true)
        })
        .map_err(|e| CoreError::storage(name, e.to_string()))?;

        debug!("Stored setting '{name}' in {:?}", self.path);
        Ok(())
    }

    fn get_or_insert_with(&self, name: &str, make: &dyn Fn() -> String) -> CoreResult<String> {
        self.modify(|values| match values.get(name).filter(|value| !value.is_empty()) {
            Some(existing) => (existing.clone(), false),
            None => {
                let value = make();
                values.insert(name.to_string(), value.clone());
                debug!("Stored new setting '{name}'");
                (value, true)
            }
        })
        .map_err(|e| CoreError::storage(name, e.to_string()))
    }
}
