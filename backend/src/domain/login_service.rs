//! Thin login collaborator over the user store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    LoginRequest, LoginService, UserPayload, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, UserId};

fn map_repo_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

/// Login service backed by the user repository.
#[derive(Clone)]
pub struct SessionLoginService {
    users: Arc<dyn UserRepository>,
}

impl SessionLoginService {
    /// Create a login service over the user store.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl LoginService for SessionLoginService {
    async fn login(&self, request: LoginRequest) -> Result<UserPayload, Error> {
        let display_name = request.display_name.trim();
        if display_name.is_empty() {
            return Err(Error::invalid_request("display name must not be empty"));
        }

        let user = self
            .users
            .find_or_create(display_name, request.role)
            .await
            .map_err(map_repo_error)?;
        Ok(user.into())
    }

    async fn current_user(&self, user: UserId) -> Result<UserPayload, Error> {
        self.users
            .find_by_id(&user)
            .await
            .map_err(map_repo_error)?
            .map(Into::into)
            .ok_or_else(|| Error::not_found(format!("user {user} not found")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, Role, User};

    #[tokio::test]
    async fn login_trims_and_registers_display_names() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_or_create()
            .times(1)
            .withf(|name, role| name == "Iris" && *role == Role::Renter)
            .returning(|name, role| {
                User::new(UserId::random(), name, role)
                    .map_err(|err| UserRepositoryError::query(err.to_string()))
            });

        let svc = SessionLoginService::new(Arc::new(users));
        let payload = svc
            .login(LoginRequest {
                display_name: "  Iris  ".to_owned(),
                role: Role::Renter,
            })
            .await
            .expect("login succeeds");
        assert_eq!(payload.display_name, "Iris");
        assert_eq!(payload.role, Role::Renter);
    }

    #[tokio::test]
    async fn login_rejects_blank_display_names() {
        let svc = SessionLoginService::new(Arc::new(MockUserRepository::new()));
        let error = svc
            .login(LoginRequest {
                display_name: "   ".to_owned(),
                role: Role::Owner,
            })
            .await
            .expect_err("blank name");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn current_user_maps_missing_users_to_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let svc = SessionLoginService::new(Arc::new(users));
        let error = svc
            .current_user(UserId::random())
            .await
            .expect_err("missing user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
