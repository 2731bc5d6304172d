//! Server construction.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use fishing_backend::ApiDoc;
use fishing_backend::inbound::http::health::HealthState;
use fishing_backend::inbound::http::{AppDependencies, build_app};
use state_builders::build_http_state;

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Swagger UI is mounted under `/docs` in debug builds.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        session,
        cors,
        bind_addr,
        db_pool,
    } = config;
    let deps = AppDependencies {
        http_state: web::Data::new(build_http_state(&db_pool)),
        health_state: health_state.clone(),
        session,
        cors,
    };

    let server = HttpServer::new(move || {
        let app = build_app(deps.clone());

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
