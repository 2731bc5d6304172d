//! Builds the HTTP state from Diesel repositories.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use fishing_backend::domain::{
    CatchService, FishingSessionService, LocationService, PasswordAccountService, StatsService,
};
use fishing_backend::inbound::http::state::HttpState;
use fishing_backend::outbound::persistence::{
    DbPool, DieselCatchRepository, DieselFishingSessionRepository, DieselLocationRepository,
    DieselUserRepository,
};
use fishing_backend::outbound::security::Argon2PasswordHasher;

/// Wire every service over one shared pool and the system clock.
pub fn build_http_state(pool: &DbPool) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let locations = Arc::new(DieselLocationRepository::new(pool.clone()));
    let sessions = Arc::new(DieselFishingSessionRepository::new(pool.clone()));
    let catches = Arc::new(DieselCatchRepository::new(pool.clone()));

    let accounts = Arc::new(PasswordAccountService::new(
        users,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::clone(&clock),
    ));
    let location_service = Arc::new(LocationService::new(
        Arc::clone(&locations),
        Arc::clone(&clock),
    ));
    let session_service = Arc::new(FishingSessionService::new(
        Arc::clone(&sessions),
        Arc::clone(&locations),
        Arc::clone(&catches),
        Arc::clone(&clock),
    ));
    let catch_service = Arc::new(CatchService::new(
        Arc::clone(&catches),
        Arc::clone(&sessions),
        Arc::clone(&clock),
    ));
    let stats = Arc::new(StatsService::new(locations, sessions, catches, clock));

    HttpState {
        accounts,
        locations: location_service.clone(),
        locations_query: location_service,
        sessions: session_service.clone(),
        sessions_query: session_service,
        catches: catch_service.clone(),
        catches_query: catch_service,
        stats,
    }
}
