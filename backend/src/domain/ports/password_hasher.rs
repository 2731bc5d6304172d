//! Port for one-way password hashing.
//!
//! Hashing is deliberately slow, so adapters must keep it off the async
//! executor threads.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Producing a hash failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes new passwords and verifies candidates against stored hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` into a self-describing string suitable for storage.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a hash produced by [`PasswordHasher::hash`].
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;

    /// Stand-in hash checked when no account matches a login. It parses like
    /// a stored hash, costs as much to verify and never matches.
    fn unknown_account_hash(&self) -> String;
}
