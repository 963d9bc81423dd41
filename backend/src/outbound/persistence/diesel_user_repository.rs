//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Role, User, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_own_pool_error(error: super::pool::PoolError) -> UserRepositoryError {
    map_pool_error(error, UserRepositoryError::connection)
}

fn map_own_diesel_error(error: &diesel::result::Error) -> UserRepositoryError {
    map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let role: Role = row
        .role
        .parse()
        .map_err(|_| UserRepositoryError::query("unknown user role in row"))?;
    User::new(UserId::from_uuid(row.id), row.display_name, role)
        .map_err(|err| UserRepositoryError::query(err.to_string()))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let row = users::table
            .find(user_id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_own_diesel_error(&err))?;

        row.map(row_to_user).transpose()
    }

    async fn find_or_create(
        &self,
        display_name: &str,
        role: Role,
    ) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        // Two racing logins for a fresh name both reach the insert; the
        // conflict target makes the loser fall through to the select below.
        let row = NewUserRow {
            id: Uuid::new_v4(),
            display_name,
            role: role.as_str(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::display_name)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        let stored = users::table
            .filter(users::display_name.eq(display_name))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        row_to_user(stored)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;

    use super::*;

    fn valid_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            display_name: "Iris".to_owned(),
            role: "renter".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_conversion_produces_a_user() {
        let user = row_to_user(valid_row()).expect("valid row converts");
        assert_eq!(user.display_name(), "Iris");
        assert_eq!(user.role(), Role::Renter);
    }

    #[test]
    fn row_conversion_rejects_unknown_roles() {
        let mut row = valid_row();
        row.role = "admin".to_owned();
        let error = row_to_user(row).expect_err("unknown role fails");
        assert!(matches!(error, UserRepositoryError::Query { .. }));
    }
}
