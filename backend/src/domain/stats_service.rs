//! Statistics service implementing the [`StatsQuery`] driving port.
//!
//! Each call loads the owner's full log once and delegates the arithmetic to
//! [`StatsSnapshot`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::fishing_session_service::{map_catch_error, map_session_error};
use crate::domain::location_service::map_location_error;
use crate::domain::ports::{
    CatchRepository, FishingSessionRepository, LocationRepository, StatsQuery,
};
use crate::domain::stats::MAX_STATS_LIMIT;
use crate::domain::{
    BaitStats, Error, LocationStats, MonthlyStats, OverviewStats, RecentActivity, SpeciesStats,
    StatsSnapshot, UserId,
};

/// Aggregated reads over the three log repositories.
#[derive(Clone)]
pub struct StatsService<L, S, C> {
    locations: Arc<L>,
    sessions: Arc<S>,
    catches: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<L, S, C> StatsService<L, S, C> {
    /// Create a service over the given repositories.
    pub fn new(
        locations: Arc<L>,
        sessions: Arc<S>,
        catches: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            locations,
            sessions,
            catches,
            clock,
        }
    }
}

impl<L, S, C> StatsService<L, S, C>
where
    L: LocationRepository,
    S: FishingSessionRepository,
    C: CatchRepository,
{
    async fn snapshot(&self, owner: &UserId) -> Result<StatsSnapshot, Error> {
        let locations = self
            .locations
            .list_for_owner(owner)
            .await
            .map_err(map_location_error)?;
        let sessions = self
            .sessions
            .list_all_for_owner(owner)
            .await
            .map_err(map_session_error)?;
        let catches = self
            .catches
            .list_all_for_owner(owner)
            .await
            .map_err(map_catch_error)?;
        Ok(StatsSnapshot {
            locations,
            sessions,
            catches,
        })
    }
}

#[async_trait]
impl<L, S, C> StatsQuery for StatsService<L, S, C>
where
    L: LocationRepository,
    S: FishingSessionRepository,
    C: CatchRepository,
{
    async fn overview(&self, owner: &UserId) -> Result<OverviewStats, Error> {
        Ok(self.snapshot(owner).await?.overview())
    }

    async fn species(&self, owner: &UserId, limit: usize) -> Result<Vec<SpeciesStats>, Error> {
        Ok(self
            .snapshot(owner)
            .await?
            .species(limit.min(MAX_STATS_LIMIT)))
    }

    async fn locations(&self, owner: &UserId) -> Result<Vec<LocationStats>, Error> {
        Ok(self.snapshot(owner).await?.locations())
    }

    async fn baits(&self, owner: &UserId, limit: usize) -> Result<Vec<BaitStats>, Error> {
        Ok(self.snapshot(owner).await?.baits(limit.min(MAX_STATS_LIMIT)))
    }

    async fn monthly(&self, owner: &UserId) -> Result<Vec<MonthlyStats>, Error> {
        let today = self.clock.utc().date_naive();
        Ok(self.snapshot(owner).await?.monthly(today))
    }

    async fn recent(&self, owner: &UserId, limit: usize) -> Result<RecentActivity, Error> {
        Ok(self.snapshot(owner).await?.recent(limit.min(MAX_STATS_LIMIT)))
    }
}
