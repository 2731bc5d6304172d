//! Fishing session service implementing the session driving ports.
//!
//! Sessions always reference one of the owner's locations. The service
//! checks that before writing so a foreign location id reads as not found
//! rather than leaking its existence through a constraint error.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::location_service::map_location_error;
use crate::domain::ports::{
    CatchRepository, CatchRepositoryError, FishingSessionCommand, FishingSessionFilter,
    FishingSessionQuery, FishingSessionRepository, FishingSessionRepositoryError,
    FishingSessionWithCatches, LocationRepository,
};
use crate::domain::{
    Catch, Error, FishingSession, FishingSessionDetails, FishingSessionPatch,
    FishingSessionSummary, Location, UserId,
};

/// Owner-scoped fishing session service.
#[derive(Clone)]
pub struct FishingSessionService<S, L, C> {
    sessions: Arc<S>,
    locations: Arc<L>,
    catches: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<S, L, C> FishingSessionService<S, L, C> {
    /// Create a service over the given repositories.
    pub fn new(
        sessions: Arc<S>,
        locations: Arc<L>,
        catches: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            locations,
            catches,
            clock,
        }
    }
}

pub(crate) fn map_session_error(error: FishingSessionRepositoryError) -> Error {
    match error {
        FishingSessionRepositoryError::Connection { message } => {
            Error::store(format!("fishing session repository unavailable: {message}"))
        }
        FishingSessionRepositoryError::Query { message } => {
            Error::internal(format!("fishing session repository error: {message}"))
        }
        FishingSessionRepositoryError::MissingLocation { location_id } => {
            missing_location(location_id)
        }
    }
}

pub(crate) fn map_catch_error(error: CatchRepositoryError) -> Error {
    match error {
        CatchRepositoryError::Connection { message } => {
            Error::store(format!("catch repository unavailable: {message}"))
        }
        CatchRepositoryError::Query { message } => {
            Error::internal(format!("catch repository error: {message}"))
        }
        CatchRepositoryError::MissingSession { session_id } => {
            Error::not_found(format!("fishing session {session_id} not found")).with_details(
                json!({ "field": "sessionId", "code": "not_found", "value": session_id }),
            )
        }
    }
}

fn missing_location(location_id: Uuid) -> Error {
    Error::not_found(format!("location {location_id} not found")).with_details(
        json!({ "field": "locationId", "code": "not_found", "value": location_id }),
    )
}

pub(crate) fn session_not_found(id: Uuid) -> Error {
    Error::not_found(format!("fishing session {id} not found"))
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl<S, L, C> FishingSessionService<S, L, C>
where
    S: FishingSessionRepository,
    L: LocationRepository,
    C: CatchRepository,
{
    async fn fetch(&self, owner: &UserId, id: Uuid) -> Result<FishingSession, Error> {
        self.sessions
            .find_for_owner(owner, id)
            .await
            .map_err(map_session_error)?
            .ok_or_else(|| session_not_found(id))
    }

    async fn owned_location(&self, owner: &UserId, id: Uuid) -> Result<Location, Error> {
        self.locations
            .find_for_owner(owner, id)
            .await
            .map_err(map_location_error)?
            .ok_or_else(|| missing_location(id))
    }

    async fn catches_of(&self, owner: &UserId, id: Uuid) -> Result<Vec<Catch>, Error> {
        self.catches
            .list_for_session(owner, id)
            .await
            .map_err(map_catch_error)
    }
}

#[async_trait]
impl<S, L, C> FishingSessionCommand for FishingSessionService<S, L, C>
where
    S: FishingSessionRepository,
    L: LocationRepository,
    C: CatchRepository,
{
    async fn create_session(
        &self,
        owner: &UserId,
        details: FishingSessionDetails,
    ) -> Result<FishingSessionSummary, Error> {
        let location = self.owned_location(owner, details.location_id()).await?;
        let now = self.clock.utc();
        let session = FishingSession {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            details,
            created_at: now,
            updated_at: now,
        };
        self.sessions
            .create(&session)
            .await
            .map_err(map_session_error)?;
        info!(owner = %owner, session_id = %session.id, "created fishing session");
        Ok(FishingSessionSummary {
            session,
            location_name: location.details.name().to_owned(),
            catches_count: 0,
        })
    }

    async fn update_session(
        &self,
        owner: &UserId,
        id: Uuid,
        patch: FishingSessionPatch,
    ) -> Result<FishingSessionSummary, Error> {
        let current = self.fetch(owner, id).await?;
        let details = current.details.patched(patch)?;
        let location = self.owned_location(owner, details.location_id()).await?;
        let updated = FishingSession {
            details,
            updated_at: self.clock.utc(),
            ..current
        };
        let found = self
            .sessions
            .update(&updated)
            .await
            .map_err(map_session_error)?;
        if !found {
            return Err(session_not_found(id));
        }
        let catches = self.catches_of(owner, id).await?;
        info!(owner = %owner, session_id = %id, "updated fishing session");
        Ok(FishingSessionSummary {
            session: updated,
            location_name: location.details.name().to_owned(),
            catches_count: count(catches.len()),
        })
    }

    async fn delete_session(&self, owner: &UserId, id: Uuid) -> Result<(), Error> {
        let removed = self
            .sessions
            .delete_with_catches(owner, id)
            .await
            .map_err(map_session_error)?
            .ok_or_else(|| session_not_found(id))?;
        info!(owner = %owner, session_id = %id, catches = removed, "deleted fishing session");
        Ok(())
    }
}

#[async_trait]
impl<S, L, C> FishingSessionQuery for FishingSessionService<S, L, C>
where
    S: FishingSessionRepository,
    L: LocationRepository,
    C: CatchRepository,
{
    async fn list_sessions(
        &self,
        owner: &UserId,
        filter: FishingSessionFilter,
        page: PageRequest,
    ) -> Result<Page<FishingSessionSummary>, Error> {
        self.sessions
            .list_for_owner(owner, filter, page)
            .await
            .map_err(map_session_error)
    }

    async fn get_session(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<FishingSessionWithCatches, Error> {
        let session = self.fetch(owner, id).await?;
        let location = self
            .locations
            .find_for_owner(owner, session.details.location_id())
            .await
            .map_err(map_location_error)?
            .ok_or_else(|| {
                Error::internal(format!("fishing session {id} references a missing location"))
            })?;
        let catches = self.catches_of(owner, id).await?;
        Ok(FishingSessionWithCatches {
            summary: FishingSessionSummary {
                session,
                location_name: location.details.name().to_owned(),
                catches_count: count(catches.len()),
            },
            catches,
        })
    }

    async fn list_session_catches(&self, owner: &UserId, id: Uuid) -> Result<Vec<Catch>, Error> {
        self.fetch(owner, id).await?;
        self.catches_of(owner, id).await
    }
}

#[cfg(test)]
#[path = "fishing_session_service_tests.rs"]
mod tests;
