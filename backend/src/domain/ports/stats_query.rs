//! Driving port for the statistics dashboard.

use async_trait::async_trait;

use crate::domain::{
    BaitStats, Error, LocationStats, MonthlyStats, OverviewStats, RecentActivity, SpeciesStats,
    UserId,
};

/// Aggregated reads over one angler's log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsQuery: Send + Sync {
    /// Totals across every session and catch.
    async fn overview(&self, owner: &UserId) -> Result<OverviewStats, Error>;

    /// Species ranked by catch count.
    async fn species(&self, owner: &UserId, limit: usize) -> Result<Vec<SpeciesStats>, Error>;

    /// Per-location session and catch totals.
    async fn locations(&self, owner: &UserId) -> Result<Vec<LocationStats>, Error>;

    /// Baits ranked by catch count.
    async fn baits(&self, owner: &UserId, limit: usize) -> Result<Vec<BaitStats>, Error>;

    /// Month-by-month totals for the trailing year.
    async fn monthly(&self, owner: &UserId) -> Result<Vec<MonthlyStats>, Error>;

    /// The latest sessions and catches.
    async fn recent(&self, owner: &UserId, limit: usize) -> Result<RecentActivity, Error>;
}
