//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, CatchCommand, CatchQuery, FishingSessionCommand, FishingSessionQuery,
    LocationCommand, LocationQuery, StatsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub locations: Arc<dyn LocationCommand>,
    pub locations_query: Arc<dyn LocationQuery>,
    pub sessions: Arc<dyn FishingSessionCommand>,
    pub sessions_query: Arc<dyn FishingSessionQuery>,
    pub catches: Arc<dyn CatchCommand>,
    pub catches_query: Arc<dyn CatchQuery>,
    pub stats: Arc<dyn StatsQuery>,
}
