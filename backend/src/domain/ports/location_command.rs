//! Driving port for location mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Location, LocationDetails, LocationPatch, UserId};

/// Location write operations, scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationCommand: Send + Sync {
    /// Create a location. Duplicate names for the same owner conflict.
    async fn create_location(
        &self,
        owner: &UserId,
        details: LocationDetails,
    ) -> Result<Location, Error>;

    /// Merge `patch` into an existing location.
    async fn update_location(
        &self,
        owner: &UserId,
        id: Uuid,
        patch: LocationPatch,
    ) -> Result<Location, Error>;

    /// Delete a location that no session references.
    async fn delete_location(&self, owner: &UserId, id: Uuid) -> Result<(), Error>;
}
