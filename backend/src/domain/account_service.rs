//! Account service implementing the [`AccountService`] driving port.
//!
//! Passwords only ever cross this module as validated [`Registration`],
//! [`LoginCredentials`] or [`PasswordChange`] values; the stored form is the
//! hasher's PHC string.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AccountService, PasswordHashError, PasswordHasher, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Error, LoginCredentials, PasswordChange, Registration, User, UserAccount, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Password-based account service.
#[derive(Clone)]
pub struct PasswordAccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> PasswordAccountService<U, H> {
    /// Create a service over the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::store(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail => Error::conflict("email address is already registered")
            .with_details(json!({ "field": "email", "code": "duplicate" })),
        UserRepositoryError::DuplicateUsername => Error::conflict("username is already taken")
            .with_details(json!({ "field": "username", "code": "duplicate" })),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

impl<U, H> PasswordAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn load(&self, id: &UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }
}

#[async_trait]
impl<U, H> AccountService for PasswordAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let user = User {
            id: UserId::random(),
            email: registration.email().clone(),
            username: registration.username().clone(),
            created_at: self.clock.utc(),
        };
        let account = UserAccount {
            user: user.clone(),
            password_hash,
        };
        self.users
            .create(&account)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id, "registered account");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let found = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?;
        // Unknown emails still pay for one verification.
        let (user, password_hash) = match found {
            Some(account) => (Some(account.user), account.password_hash),
            None => (None, self.hasher.unknown_account_hash()),
        };
        let verified = self
            .hasher
            .verify(credentials.password(), &password_hash)
            .await
            .map_err(map_hash_error)?;
        match user {
            Some(user) if verified => Ok(user),
            _ => Err(Error::unauthorized(INVALID_CREDENTIALS)),
        }
    }

    async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        self.load(id).await.map(|account| account.user)
    }

    async fn change_password(&self, id: &UserId, change: PasswordChange) -> Result<(), Error> {
        let account = self.load(id).await?;
        let verified = self
            .hasher
            .verify(change.current(), &account.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !verified {
            return Err(Error::unauthorized("current password is incorrect")
                .with_details(json!({ "field": "currentPassword", "code": "mismatch" })));
        }
        let password_hash = self
            .hasher
            .hash(change.replacement())
            .await
            .map_err(map_hash_error)?;
        let updated = self
            .users
            .update_password_hash(id, &password_hash, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(Error::unauthorized("session user no longer exists"));
        }
        info!(user_id = %id, "changed password");
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
