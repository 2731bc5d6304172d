//! Driving port for fishing session mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Error, FishingSessionDetails, FishingSessionPatch, FishingSessionSummary, UserId,
};

/// Fishing session write operations, scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FishingSessionCommand: Send + Sync {
    /// Record a session at one of the owner's locations.
    async fn create_session(
        &self,
        owner: &UserId,
        details: FishingSessionDetails,
    ) -> Result<FishingSessionSummary, Error>;

    /// Merge `patch` into an existing session. The duration is recomputed
    /// from the resulting start and end times.
    async fn update_session(
        &self,
        owner: &UserId,
        id: Uuid,
        patch: FishingSessionPatch,
    ) -> Result<FishingSessionSummary, Error>;

    /// Delete a session and every catch attached to it.
    async fn delete_session(&self, owner: &UserId, id: Uuid) -> Result<(), Error>;
}
