//! File persistence for the flagline SDK: the install's key-value settings
//! (which hold the anonymous user key) and the cache of recently seen users.

mod atomic_file;
mod error;
mod file_store;
mod load_result;
mod user_cache;

#[cfg(test)]
mod tests;

pub use error::{FileOperation, StorageError, StorageResult};
pub use file_store::FileKeyValueStore;
pub use load_result::LoadResult;
pub use user_cache::UserCache;

const SETTINGS_FILENAME: &str = "settings.json";
const USERS_FILENAME: &str = "users.json";
const BACKUP_DATE_FORMAT: &str = "%Y%m%d_%H%M%S";
const LOCK_SUFFIX: &str = ".lock";
