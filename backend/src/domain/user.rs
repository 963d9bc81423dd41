//! User identity, marketplace role, and the authenticated principal.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The supplied identifier is not a UUID.
    InvalidId,
    /// The display name is empty after trimming.
    EmptyDisplayName,
    /// The display name exceeds [`DISPLAY_NAME_MAX`] characters.
    DisplayNameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The role string matches no known marketplace role.
    UnknownRole,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::UnknownRole => write!(f, "role must be renter or owner"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketplace role attached to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Books listings created by owners.
    Renter,
    /// Creates listings and arbitrates booking requests.
    Owner,
}

impl Role {
    /// Stable string form used in persistence and sessions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Renter => "renter",
            Self::Owner => "owner",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "renter" => Ok(Self::Renter),
            "owner" => Ok(Self::Owner),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated caller identity supplied by the session collaborator.
///
/// The domain trusts this principal and performs no credential checks of its
/// own; authorisation decisions compare its id against entity ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Authenticated user id.
    pub id: UserId,
    /// Marketplace role carried in the session.
    pub role: Role,
}

/// Registered marketplace user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    display_name: String,
    role: Role,
}

impl User {
    /// Validate and construct a user.
    pub fn new(
        id: UserId,
        display_name: impl Into<String>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self {
            id,
            display_name,
            role,
        })
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name shown to other users.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Marketplace role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Principal equivalent of this user for session storage.
    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("renter", Role::Renter)]
    #[case("owner", Role::Owner)]
    fn role_parses_stable_strings(#[case] raw: &str, #[case] expected: Role) {
        let parsed: Role = raw.parse().expect("known role");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[test]
    fn role_rejects_unknown_strings() {
        let err = "admin".parse::<Role>().expect_err("unknown role");
        assert_eq!(err, UserValidationError::UnknownRole);
    }

    #[test]
    fn user_rejects_blank_display_name() {
        let err = User::new(UserId::random(), "   ", Role::Renter).expect_err("blank name");
        assert_eq!(err, UserValidationError::EmptyDisplayName);
    }

    #[test]
    fn user_rejects_oversized_display_name() {
        let name = "x".repeat(DISPLAY_NAME_MAX + 1);
        let err = User::new(UserId::random(), name, Role::Owner).expect_err("too long");
        assert!(matches!(err, UserValidationError::DisplayNameTooLong { .. }));
    }

    #[test]
    fn user_id_rejects_garbage() {
        let err = UserId::new("not-a-uuid").expect_err("invalid id");
        assert_eq!(err, UserValidationError::InvalidId);
    }

    #[test]
    fn principal_mirrors_user_identity() {
        let user = User::new(UserId::random(), "Mara", Role::Owner).expect("valid user");
        let principal = user.principal();
        assert_eq!(principal.id, user.id());
        assert_eq!(principal.role, Role::Owner);
    }
}
