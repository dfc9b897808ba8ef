use crate::{CoreError, CoreResult, User};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;

/// Reads one privatizable scalar attribute off a user.
pub type ScalarAccessor = fn(&User) -> Option<&str>;

/// Every attribute a user carries, named by its record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserAttribute {
    Key,
    Name,
    FirstName,
    LastName,
    Country,
    Ip,
    Email,
    Avatar,
    Custom,
    Anonymous,
    Device,
    OperatingSystem,
}

impl UserAttribute {
    pub const ALL: [UserAttribute; 12] = [
        Self::Key,
        Self::Name,
        Self::FirstName,
        Self::LastName,
        Self::Country,
        Self::Ip,
        Self::Email,
        Self::Avatar,
        Self::Custom,
        Self::Anonymous,
        Self::Device,
        Self::OperatingSystem,
    ];

    /// Attributes whose values may be withheld from records.
    pub const PRIVATIZABLE: [UserAttribute; 8] = [
        Self::Name,
        Self::FirstName,
        Self::LastName,
        Self::Country,
        Self::Ip,
        Self::Email,
        Self::Avatar,
        Self::Custom,
    ];

    /// Privatizable scalars in record emission order, each with its accessor.
    pub const PRIVATIZABLE_SCALARS: [(UserAttribute, ScalarAccessor); 7] = [
        (Self::Name, name),
        (Self::FirstName, first_name),
        (Self::LastName, last_name),
        (Self::Country, country),
        (Self::Ip, ip_address),
        (Self::Email, email),
        (Self::Avatar, avatar),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Name => "name",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Country => "country",
            Self::Ip => "ip",
            Self::Email => "email",
            Self::Avatar => "avatar",
            Self::Custom => "custom",
            Self::Anonymous => "anonymous",
            Self::Device => "device",
            Self::OperatingSystem => "os",
        }
    }

    pub fn is_privatizable(&self) -> bool {
        Self::PRIVATIZABLE.contains(self)
    }

    /// SDK-owned attributes live inside `custom` but are never redacted.
    pub fn is_sdk_owned(&self) -> bool {
        matches!(self, Self::Device | Self::OperatingSystem)
    }

    /// Record names of every privatizable attribute.
    pub fn privatizable_names() -> impl Iterator<Item = &'static str> {
        Self::PRIVATIZABLE
            .into_iter()
            .map(|attribute| attribute.as_str())
    }

    /// Whether `name` is the custom-map key of an SDK-owned attribute.
    pub fn is_sdk_owned_name(name: &str) -> bool {
        name == Self::Device.as_str() || name == Self::OperatingSystem.as_str()
    }
}

impl fmt::Display for UserAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserAttribute {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match Self::ALL.into_iter().find(|attribute| attribute.as_str() == s) {
            Some(attribute) => Ok(attribute),
            None => Err(CoreError::UnknownAttribute {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

fn name(user: &User) -> Option<&str> {
    user.name.as_deref()
}

fn first_name(user: &User) -> Option<&str> {
    user.first_name.as_deref()
}

fn last_name(user: &User) -> Option<&str> {
    user.last_name.as_deref()
}

fn country(user: &User) -> Option<&str> {
    user.country.as_deref()
}

fn ip_address(user: &User) -> Option<&str> {
    user.ip_address.as_deref()
}

fn email(user: &User) -> Option<&str> {
    user.email.as_deref()
}

fn avatar(user: &User) -> Option<&str> {
    user.avatar.as_deref()
}
