use crate::atomic_file::{FileLock, backup_corrupted, read_if_exists, write_atomic};
use crate::{LoadResult, StorageError, StorageResult, USERS_FILENAME};

use fl_core::{Environment, PrivacyPolicy, RecordOptions, User, load_cached_user};

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::{Map, Value};

/// Recently seen users persisted as `users.json`, a map from user key to the
/// user's cache record.
///
/// Records are written with private values and flags included, since they
/// never leave the device. Entries in the legacy layout are migrated on load.
/// Writers hold the file lock, so concurrent `store_user` calls from several
/// processes do not drop each other's users.
#[derive(Debug)]
pub struct UserCache {
    path: PathBuf,
    max_cached_users: usize,
}

impl UserCache {
    pub fn new(dir: impl AsRef<Path>, max_cached_users: usize) -> Self {
        Self {
            path: dir.as_ref().join(USERS_FILENAME),
            max_cached_users,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads cached users, most recently updated first.
    ///
    /// Returns:
    /// - `Ok(LoadResult { users, corruption_error: None })` - loaded (empty on first launch)
    /// - `Ok(LoadResult { users: [], corruption_error: Some(...) })` - file exists but corrupted
    pub fn load(&self, env: &dyn Environment) -> StorageResult<LoadResult> {
        let Some(contents) = read_if_exists(&self.path)? else {
            info!("No user cache at {:?} (first launch)", self.path);
            return Ok(LoadResult::default());
        };

        let records = match parse_records(&self.path, &contents) {
            Ok(records) => records,
            Err(e) => {
                warn!("{e}");
                return Ok(LoadResult {
                    users: Vec::new(),
                    corruption_error: Some(e.to_string()),
                });
            }
        };

        let mut users: Vec<User> = records
            .iter()
            .filter_map(|(key, record)| {
                let user = load_cached_user(record, env);
                if user.is_none() {
                    warn!("Skipping unreadable cache entry for user {key}");
                }
                user
            })
            .collect();
        users.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));

        info!("Loaded {} cached users from {:?}", users.len(), self.path);
        Ok(LoadResult {
            users,
            corruption_error: None,
        })
    }

    /// Replaces the cache contents with `users`, keeping only the most
    /// recently updated `max_cached_users` distinct keys.
    pub fn save(&self, users: &[User]) -> StorageResult<()> {
        let _lock = FileLock::exclusive(&self.path)?;
        self.write_users(users.to_vec())
    }

    /// Inserts or replaces `user` (matched by key) and saves.
    ///
    /// A corrupted cache file is backed up and replaced.
    pub fn store_user(&self, user: &User, env: &dyn Environment) -> StorageResult<()> {
        let _lock = FileLock::exclusive(&self.path)?;

        let loaded = self.load(env)?;
        if loaded.corruption_error.is_some() {
            backup_corrupted(&self.path)?;
        }

        let mut users = loaded.users;
        users.retain(|cached| cached != user);
        users.insert(0, user.clone());
        self.write_users(users)
    }

    /// Backs up a corrupted cache file for debugging.
    ///
    /// Renames `users.json` to `users.json.corrupted.{timestamp}`.
    pub fn backup_corrupted(&self) -> StorageResult<Option<PathBuf>> {
        let _lock = FileLock::exclusive(&self.path)?;
        backup_corrupted(&self.path)
    }

    fn write_users(&self, mut users: Vec<User>) -> StorageResult<()> {
        if self.max_cached_users == 0 {
            debug!("User cache disabled, not saving");
            return Ok(());
        }

        users.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));

        let policy = PrivacyPolicy::default();
        let mut records = Map::new();
        for user in users {
            if records.len() == self.max_cached_users {
                break;
            }
            if records.contains_key(&user.key) {
                continue;
            }
            let record = user.to_record(&policy, RecordOptions::CACHE);
            records.insert(user.key.clone(), Value::Object(record));
        }

        let json = serde_json::to_string_pretty(&records)?;
        self.write_with_retry(json.as_bytes())?;

        info!("Saved {} users to {:?}", records.len(), self.path);
        Ok(())
    }

    /// Writes the cache file, retrying once after a transient failure.
    fn write_with_retry(&self, contents: &[u8]) -> StorageResult<()> {
        match write_atomic(&self.path, contents) {
            Err(e) if e.is_transient() => {
                warn!("Retrying user cache write after: {e}");
                write_atomic(&self.path, contents)
            }
            other => other,
        }
    }
}

fn parse_records(path: &Path, contents: &str) -> StorageResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(contents) {
        Ok(Value::Object(records)) => Ok(records),
        Ok(_) => Err(StorageError::corrupted(path, "expected an object keyed by user key")),
        Err(e) => Err(StorageError::corrupted(path, e.to_string())),
    }
}
