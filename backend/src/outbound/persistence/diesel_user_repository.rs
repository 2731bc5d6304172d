//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, User, UserAccount, UserId, Username};

use super::diesel_error_mapping::{
    ConstraintViolation, constraint_violation, map_diesel_error as map_basic_diesel_error,
    map_pool_error as map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of the account store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::Unique(name)) if name.contains("email") => {
            UserRepositoryError::duplicate_email()
        }
        Some(ConstraintViolation::Unique(name)) if name.contains("username") => {
            UserRepositoryError::duplicate_username()
        }
        _ => map_basic_diesel_error(
            error,
            UserRepositoryError::query,
            UserRepositoryError::connection,
        ),
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserRepositoryError> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| UserRepositoryError::query(format!("stored email invalid: {err}")))?;
    let username = Username::new(row.username)
        .map_err(|err| UserRepositoryError::query(format!("stored username invalid: {err}")))?;
    Ok(UserAccount {
        user: User {
            id: UserId::from_uuid(row.id),
            email,
            username,
            created_at: row.created_at,
        },
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = &account.user;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            username: user.username.as_ref(),
            password_hash: &account.password_hash,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(users::table.find(id.as_uuid()))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
