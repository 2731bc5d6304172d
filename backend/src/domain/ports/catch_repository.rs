//! Port for catch record persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{Catch, CatchFilter, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catch repository adapters.
    pub enum CatchRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catch repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "catch repository query failed: {message}",
        /// The referenced fishing session no longer exists.
        MissingSession { session_id: uuid::Uuid } =>
            "fishing session {session_id} does not exist",
    }
}

/// Port for reading and writing catches, scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatchRepository: Send + Sync {
    /// Insert a new catch.
    async fn create(&self, catch: &Catch) -> Result<(), CatchRepositoryError>;

    /// Find one of the owner's catches.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Catch>, CatchRepositoryError>;

    /// Page through the owner's catches matching `filter`, newest first.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: &CatchFilter,
        page: PageRequest,
    ) -> Result<Page<Catch>, CatchRepositoryError>;

    /// Catches attached to one session, oldest first.
    async fn list_for_session(
        &self,
        owner: &UserId,
        session_id: Uuid,
    ) -> Result<Vec<Catch>, CatchRepositoryError>;

    /// Every catch of the owner, unordered.
    async fn list_all_for_owner(&self, owner: &UserId) -> Result<Vec<Catch>, CatchRepositoryError>;

    /// Persist new attributes. Returns `false` when the row is missing.
    async fn update(&self, catch: &Catch) -> Result<bool, CatchRepositoryError>;

    /// Delete one of the owner's catches. Returns `false` when missing.
    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatchRepositoryError>;
}
