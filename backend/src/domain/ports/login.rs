//! Driving port for the thin login collaborator.
//!
//! The marketplace core trusts the session principal; this port only turns a
//! display name and role into a stable user identity. Password and token
//! mechanics live outside this system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Role, User, UserId};

/// Serialisable user projection returned by the login port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    /// User identifier.
    pub id: UserId,
    /// Display name shown to other users.
    pub display_name: String,
    /// Marketplace role.
    pub role: Role,
}

impl From<User> for UserPayload {
    fn from(value: User) -> Self {
        Self {
            id: value.id(),
            display_name: value.display_name().to_owned(),
            role: value.role(),
        }
    }
}

/// Request to log in with a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRequest {
    /// Requested display name.
    pub display_name: String,
    /// Role to register with; existing users keep their stored role.
    pub role: Role,
}

/// Driving port for login and identity reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Find or register the user and return their identity.
    async fn login(&self, request: LoginRequest) -> Result<UserPayload, Error>;

    /// Read the authenticated user's own record.
    async fn current_user(&self, user: UserId) -> Result<UserPayload, Error>;
}
