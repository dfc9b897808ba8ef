use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors raised around the identity model: persistence, JSON, and parsing
/// attribute names.
///
/// Constructing and serializing users is total and never returns these.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error for '{name}': {message} {location}")]
    Storage {
        name: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown user attribute: {value} {location}")]
    UnknownAttribute {
        value: String,
        location: ErrorLocation,
    },

    #[error("JSON error: {source} {location}")]
    Json {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Creates Storage error at caller location.
    #[track_caller]
    pub fn storage(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            name: name.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type CoreResult<T> = StdResult<T, CoreError>;
