use std::fmt;
use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    CreateDir,
    Read,
    Write,
    Replace,
    Lock,
    Backup,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateDir => "create directory",
            Self::Read => "read",
            Self::Write => "write",
            Self::Replace => "replace",
            Self::Lock => "lock",
            Self::Backup => "back up",
        })
    }
}

/// Errors raised while reading or writing SDK files.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to {operation} {path}: {source} {location}")]
    Io {
        operation: FileOperation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("File corrupted at {path}: {message} {location}")]
    Corrupted {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to serialize: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl StorageError {
    /// Whether repeating the operation may succeed, e.g. when another
    /// process briefly holds the file.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Io {
                operation: FileOperation::Read
                    | FileOperation::Write
                    | FileOperation::Replace
                    | FileOperation::Lock,
                ..
            }
        )
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::Io { operation, .. } => match operation {
                FileOperation::CreateDir | FileOperation::Write | FileOperation::Replace => {
                    "Check disk space and permissions of the cache directory."
                }
                FileOperation::Read | FileOperation::Lock => {
                    "Another flagline process may be using the cache directory. Try again."
                }
                FileOperation::Backup => {
                    "Move the corrupted file out of the cache directory by hand."
                }
            },
            Self::Corrupted { .. } => "Delete or back up the file; defaults are used meanwhile.",
            Self::Serialization { .. } => "Please report this issue.",
        }
    }

    /// Creates Io error at caller location.
    #[track_caller]
    pub fn io(operation: FileOperation, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Corrupted error at caller location.
    #[track_caller]
    pub fn corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupted {
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
