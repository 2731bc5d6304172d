//! Catch service implementing the catch driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::fishing_session_service::{map_catch_error, map_session_error};
use crate::domain::ports::{
    CatchCommand, CatchQuery, CatchRepository, FishingSessionRepository,
};
use crate::domain::{Catch, CatchDetails, CatchFilter, CatchPatch, Error, UserId};

/// Owner-scoped catch service.
#[derive(Clone)]
pub struct CatchService<C, S> {
    catches: Arc<C>,
    sessions: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<C, S> CatchService<C, S> {
    /// Create a service over the given repositories.
    pub fn new(catches: Arc<C>, sessions: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catches,
            sessions,
            clock,
        }
    }
}

fn catch_not_found(id: Uuid) -> Error {
    Error::not_found(format!("catch {id} not found"))
}

impl<C, S> CatchService<C, S>
where
    C: CatchRepository,
    S: FishingSessionRepository,
{
    async fn fetch(&self, owner: &UserId, id: Uuid) -> Result<Catch, Error> {
        self.catches
            .find_for_owner(owner, id)
            .await
            .map_err(map_catch_error)?
            .ok_or_else(|| catch_not_found(id))
    }

    async fn ensure_session(&self, owner: &UserId, session_id: Option<Uuid>) -> Result<(), Error> {
        let Some(session_id) = session_id else {
            return Ok(());
        };
        let found = self
            .sessions
            .find_for_owner(owner, session_id)
            .await
            .map_err(map_session_error)?;
        if found.is_none() {
            return Err(
                Error::not_found(format!("fishing session {session_id} not found")).with_details(
                    json!({ "field": "sessionId", "code": "not_found", "value": session_id }),
                ),
            );
        }
        Ok(())
    }
}

#[async_trait]
impl<C, S> CatchCommand for CatchService<C, S>
where
    C: CatchRepository,
    S: FishingSessionRepository,
{
    async fn create_catch(&self, owner: &UserId, details: CatchDetails) -> Result<Catch, Error> {
        self.ensure_session(owner, details.session_id()).await?;
        let now = self.clock.utc();
        let catch = Catch {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            details,
            created_at: now,
            updated_at: now,
        };
        self.catches.create(&catch).await.map_err(map_catch_error)?;
        info!(owner = %owner, catch_id = %catch.id, "logged catch");
        Ok(catch)
    }

    async fn update_catch(
        &self,
        owner: &UserId,
        id: Uuid,
        patch: CatchPatch,
    ) -> Result<Catch, Error> {
        let current = self.fetch(owner, id).await?;
        let details = current.details.patched(patch)?;
        if details.session_id() != current.details.session_id() {
            self.ensure_session(owner, details.session_id()).await?;
        }
        let updated = Catch {
            details,
            updated_at: self.clock.utc(),
            ..current
        };
        let found = self.catches.update(&updated).await.map_err(map_catch_error)?;
        if !found {
            return Err(catch_not_found(id));
        }
        info!(owner = %owner, catch_id = %id, "updated catch");
        Ok(updated)
    }

    async fn delete_catch(&self, owner: &UserId, id: Uuid) -> Result<(), Error> {
        let removed = self
            .catches
            .delete(owner, id)
            .await
            .map_err(map_catch_error)?;
        if !removed {
            return Err(catch_not_found(id));
        }
        info!(owner = %owner, catch_id = %id, "deleted catch");
        Ok(())
    }
}

#[async_trait]
impl<C, S> CatchQuery for CatchService<C, S>
where
    C: CatchRepository,
    S: FishingSessionRepository,
{
    async fn list_catches(
        &self,
        owner: &UserId,
        filter: &CatchFilter,
        page: PageRequest,
    ) -> Result<Page<Catch>, Error> {
        self.catches
            .list_for_owner(owner, filter, page)
            .await
            .map_err(map_catch_error)
    }

    async fn get_catch(&self, owner: &UserId, id: Uuid) -> Result<Catch, Error> {
        self.fetch(owner, id).await
    }
}
