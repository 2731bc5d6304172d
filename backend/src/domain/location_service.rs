//! Location service implementing the location driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    LocationCommand, LocationDeletion, LocationQuery, LocationRepository, LocationRepositoryError,
};
use crate::domain::{Error, Location, LocationDetails, LocationPatch, UserId};

/// Owner-scoped location service.
#[derive(Clone)]
pub struct LocationService<L> {
    locations: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> LocationService<L> {
    /// Create a service over the given repository.
    pub fn new(locations: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { locations, clock }
    }
}

pub(crate) fn map_location_error(error: LocationRepositoryError) -> Error {
    match error {
        LocationRepositoryError::Connection { message } => {
            Error::store(format!("location repository unavailable: {message}"))
        }
        LocationRepositoryError::Query { message } => {
            Error::internal(format!("location repository error: {message}"))
        }
        LocationRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("a location named '{name}' already exists"))
                .with_details(json!({ "field": "name", "code": "duplicate", "value": name }))
        }
    }
}

pub(crate) fn location_not_found(id: Uuid) -> Error {
    Error::not_found(format!("location {id} not found"))
}

impl<L> LocationService<L>
where
    L: LocationRepository,
{
    async fn fetch(&self, owner: &UserId, id: Uuid) -> Result<Location, Error> {
        self.locations
            .find_for_owner(owner, id)
            .await
            .map_err(map_location_error)?
            .ok_or_else(|| location_not_found(id))
    }
}

#[async_trait]
impl<L> LocationCommand for LocationService<L>
where
    L: LocationRepository,
{
    async fn create_location(
        &self,
        owner: &UserId,
        details: LocationDetails,
    ) -> Result<Location, Error> {
        let now = self.clock.utc();
        let location = Location {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            details,
            created_at: now,
            updated_at: now,
        };
        self.locations
            .create(&location)
            .await
            .map_err(map_location_error)?;
        info!(owner = %owner, location_id = %location.id, "created location");
        Ok(location)
    }

    async fn update_location(
        &self,
        owner: &UserId,
        id: Uuid,
        patch: LocationPatch,
    ) -> Result<Location, Error> {
        let current = self.fetch(owner, id).await?;
        let updated = Location {
            details: current.details.patched(patch)?,
            updated_at: self.clock.utc(),
            ..current
        };
        let found = self
            .locations
            .update(&updated)
            .await
            .map_err(map_location_error)?;
        if !found {
            return Err(location_not_found(id));
        }
        info!(owner = %owner, location_id = %id, "updated location");
        Ok(updated)
    }

    async fn delete_location(&self, owner: &UserId, id: Uuid) -> Result<(), Error> {
        match self
            .locations
            .delete_if_unused(owner, id)
            .await
            .map_err(map_location_error)?
        {
            LocationDeletion::Deleted => {
                info!(owner = %owner, location_id = %id, "deleted location");
                Ok(())
            }
            LocationDeletion::NotFound => Err(location_not_found(id)),
            LocationDeletion::InUse { sessions } => Err(Error::conflict(
                "location still has fishing sessions",
            )
            .with_details(json!({ "code": "location_in_use", "sessions": sessions }))),
        }
    }
}

#[async_trait]
impl<L> LocationQuery for LocationService<L>
where
    L: LocationRepository,
{
    async fn list_locations(&self, owner: &UserId) -> Result<Vec<Location>, Error> {
        self.locations
            .list_for_owner(owner)
            .await
            .map_err(map_location_error)
    }

    async fn get_location(&self, owner: &UserId, id: Uuid) -> Result<Location, Error> {
        self.fetch(owner, id).await
    }
}
