//! HTTP inbound adapter exposing the REST endpoints.
//!
//! [`build_app`] assembles the full application: trace ids outermost, then
//! the CORS allow-list, the cookie session on `/api/v1`, health checks and a
//! JSON 404 fallback.

pub mod accounts;
pub mod body;
pub mod catches;
pub mod error;
pub mod fishing_sessions;
pub mod health;
pub mod locations;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::middleware::{CorsPolicy, Trace};
use error::{json_error_handler, not_found, path_error_handler, query_error_handler};
use health::HealthState;
use session_config::{SessionSettings, session_middleware};
use state::HttpState;

/// Register every `/api/v1` handler and the extractor error handlers on a
/// scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_user)
        .service(accounts::change_password)
        .service(locations::list_locations)
        .service(locations::create_location)
        .service(locations::get_location)
        .service(locations::update_location)
        .service(locations::delete_location)
        .service(fishing_sessions::list_sessions)
        .service(fishing_sessions::create_session)
        .service(fishing_sessions::list_session_catches)
        .service(fishing_sessions::get_session)
        .service(fishing_sessions::update_session)
        .service(fishing_sessions::delete_session)
        .service(catches::list_catches)
        .service(catches::create_catch)
        .service(catches::get_catch)
        .service(catches::update_catch)
        .service(catches::delete_catch)
        .service(stats::overview)
        .service(stats::species)
        .service(stats::locations)
        .service(stats::baits)
        .service(stats::monthly)
        .service(stats::recent);
}

/// Everything [`build_app`] needs; cloned into each worker.
#[derive(Clone)]
pub struct AppDependencies {
    pub http_state: web::Data<HttpState>,
    pub health_state: web::Data<HealthState>,
    pub session: SessionSettings,
    pub cors: CorsPolicy,
}

/// Build the Actix application shared by the server and the HTTP tests.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        health_state,
        session,
        cors,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session_middleware(&session))
        .configure(configure);

    App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(cors.middleware())
        .wrap(Trace)
        .service(api)
        .service(health::ready)
        .service(health::live)
        .default_service(web::to(not_found))
}
