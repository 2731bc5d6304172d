//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and the integration tests in `tests/`
//! (through the `test-support` feature). Nothing here touches PostgreSQL:
//! [`InMemoryStore`] stands in for every repository and [`test_app`] wires
//! it into the production application.

pub mod clock;
pub mod memory;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::Clock;

use crate::domain::{
    CatchService, FishingSessionService, LocationService, PasswordAccountService, StatsService,
};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{AppDependencies, build_app};
use crate::middleware::CorsPolicy;

pub use clock::{MutableClock, fixture_instant};
pub use memory::{InMemoryStore, PlaintextPasswordHasher};

/// Wire every service over `store`, hashing passwords in plain text.
pub fn http_state(store: &Arc<InMemoryStore>, clock: Arc<dyn Clock>) -> HttpState {
    let accounts = Arc::new(PasswordAccountService::new(
        Arc::clone(store),
        Arc::new(PlaintextPasswordHasher),
        Arc::clone(&clock),
    ));
    let locations = Arc::new(LocationService::new(Arc::clone(store), Arc::clone(&clock)));
    let sessions = Arc::new(FishingSessionService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(&clock),
    ));
    let catches = Arc::new(CatchService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(&clock),
    ));
    let stats = Arc::new(StatsService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        clock,
    ));
    HttpState {
        accounts,
        locations: locations.clone(),
        locations_query: locations,
        sessions: sessions.clone(),
        sessions_query: sessions,
        catches: catches.clone(),
        catches_query: catches,
        stats,
    }
}

/// The production application over `state`, with a fresh session key,
/// non-`Secure` cookies and a ready health state.
pub fn test_app(
    state: HttpState,
    cors: CorsPolicy,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health = HealthState::new();
    health.mark_ready();
    build_app(AppDependencies {
        http_state: web::Data::new(state),
        health_state: web::Data::new(health),
        session: SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
        },
        cors,
    })
}
