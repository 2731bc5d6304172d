//! Driving port for catch mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Catch, CatchDetails, CatchPatch, Error, UserId};

/// Catch write operations, scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatchCommand: Send + Sync {
    /// Log a catch. A referenced session must belong to the owner.
    async fn create_catch(&self, owner: &UserId, details: CatchDetails) -> Result<Catch, Error>;

    /// Merge `patch` into an existing catch.
    async fn update_catch(
        &self,
        owner: &UserId,
        id: Uuid,
        patch: CatchPatch,
    ) -> Result<Catch, Error>;

    /// Remove a catch.
    async fn delete_catch(&self, owner: &UserId, id: Uuid) -> Result<(), Error>;
}
