//! Driving port for fishing session reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{Catch, Error, FishingSessionSummary, UserId};

use super::FishingSessionFilter;

/// A session together with the catches logged during it.
#[derive(Debug, Clone, PartialEq)]
pub struct FishingSessionWithCatches {
    pub summary: FishingSessionSummary,
    pub catches: Vec<Catch>,
}

/// Fishing session read operations, scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FishingSessionQuery: Send + Sync {
    /// Page through sessions, latest first.
    async fn list_sessions(
        &self,
        owner: &UserId,
        filter: FishingSessionFilter,
        page: PageRequest,
    ) -> Result<Page<FishingSessionSummary>, Error>;

    /// One session with its catches.
    async fn get_session(&self, owner: &UserId, id: Uuid)
    -> Result<FishingSessionWithCatches, Error>;

    /// Catches attached to one session. Fails when the session is unknown.
    async fn list_session_catches(&self, owner: &UserId, id: Uuid) -> Result<Vec<Catch>, Error>;
}
