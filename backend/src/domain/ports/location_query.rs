//! Driving port for location reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Location, UserId};

/// Location read operations, scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationQuery: Send + Sync {
    /// Every location of the owner ordered by name.
    async fn list_locations(&self, owner: &UserId) -> Result<Vec<Location>, Error>;

    /// One location, or a not-found error.
    async fn get_location(&self, owner: &UserId, id: Uuid) -> Result<Location, Error>;
}
