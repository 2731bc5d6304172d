//! Port for fishing location persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Location, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by location repository adapters.
    pub enum LocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "location repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "location repository query failed: {message}",
        /// The owner already has a location with this name.
        DuplicateName { name: String } =>
            "a location named '{name}' already exists",
    }
}

/// Outcome of a guarded location delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationDeletion {
    /// The location was removed.
    Deleted,
    /// No location with that id belongs to the owner.
    NotFound,
    /// Sessions still reference the location; nothing was removed.
    InUse { sessions: u64 },
}

/// Port for reading and writing locations. Every read and write is scoped
/// to the owning user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Insert a new location.
    async fn create(&self, location: &Location) -> Result<(), LocationRepositoryError>;

    /// Find one of the owner's locations.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Location>, LocationRepositoryError>;

    /// List every location of the owner ordered by name.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Location>, LocationRepositoryError>;

    /// Persist new attributes. Returns `false` when the row is missing.
    async fn update(&self, location: &Location) -> Result<bool, LocationRepositoryError>;

    /// Delete the location unless sessions still reference it. The check
    /// and the delete run in one transaction.
    async fn delete_if_unused(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<LocationDeletion, LocationRepositoryError>;
}
