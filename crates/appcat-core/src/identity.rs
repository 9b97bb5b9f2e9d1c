//! Caller identity as resolved by the upstream gateway.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a role string is not one of the known roles.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

/// Caller role, one of the three values assigned by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Administrator of a single organization.
    OrgAdmin,
    /// Administrator of the whole catalog.
    ProductAdmin,
    /// Regular catalog user.
    User,
}

impl Role {
    /// Wire representation of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrgAdmin => "ORG_ADMIN",
            Self::ProductAdmin => "PRODUCT_ADMIN",
            Self::User => "USER",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORG_ADMIN" => Ok(Self::OrgAdmin),
            "PRODUCT_ADMIN" => Ok(Self::ProductAdmin),
            "USER" => Ok(Self::User),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity attached to every inbound call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user id from the identity provider.
    pub user_id: String,
    /// Resolved role.
    pub role: Role,
    /// Organization the user belongs to.
    pub organization_id: String,
}
