//! Port for fishing session persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{FishingSession, FishingSessionSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by fishing session repository adapters.
    pub enum FishingSessionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "fishing session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "fishing session repository query failed: {message}",
        /// The referenced location no longer exists.
        MissingLocation { location_id: uuid::Uuid } =>
            "location {location_id} does not exist",
    }
}

/// Filters accepted by session listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FishingSessionFilter {
    pub location_id: Option<Uuid>,
}

/// Port for reading and writing fishing sessions, scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FishingSessionRepository: Send + Sync {
    /// Insert a new session.
    async fn create(&self, session: &FishingSession) -> Result<(), FishingSessionRepositoryError>;

    /// Find one of the owner's sessions.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<FishingSession>, FishingSessionRepositoryError>;

    /// Page through the owner's sessions, latest date and start time first,
    /// with location names and catch counts attached.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: FishingSessionFilter,
        page: PageRequest,
    ) -> Result<Page<FishingSessionSummary>, FishingSessionRepositoryError>;

    /// Every session of the owner, unordered.
    async fn list_all_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<FishingSession>, FishingSessionRepositoryError>;

    /// Persist new attributes. Returns `false` when the row is missing.
    async fn update(&self, session: &FishingSession) -> Result<bool, FishingSessionRepositoryError>;

    /// Delete a session together with its catches in one transaction.
    /// Returns the number of catches removed, or `None` when the session
    /// does not belong to the owner.
    async fn delete_with_catches(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<u64>, FishingSessionRepositoryError>;
}
