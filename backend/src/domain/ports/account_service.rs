//! Driving port for registration, login, and password management.
//!
//! Handlers parse request bodies into the validated credential types from
//! [`crate::domain::auth`] and then call this port; the port never sees raw
//! strings.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, PasswordChange, Registration, User, UserId};

/// Account lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account. Fails with a conflict when the email or username
    /// is already in use.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and return the matching user. Unknown emails and
    /// wrong passwords both yield the same unauthorised error.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error>;

    /// Load the user bound to an authenticated session.
    async fn current_user(&self, id: &UserId) -> Result<User, Error>;

    /// Replace the password after re-checking the current one.
    async fn change_password(&self, id: &UserId, change: PasswordChange) -> Result<(), Error>;
}
