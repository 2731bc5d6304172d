//! Backend entry-point: loads settings, prepares the database and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fishing_backend::inbound::http::health::HealthState;
use fishing_backend::inbound::http::session_config::{BuildMode, session_settings};
use fishing_backend::outbound::persistence::{DbPool, run_migrations};
use fishing_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let platform_port = std::env::var("PORT").ok();
    let bind_addr = settings.bind_addr(platform_port.as_deref())?;
    let pool_config = settings.pool_config()?;
    let cors = settings.cors_policy()?;
    let session = session_settings(&settings.session_options(), BuildMode::from_debug_assertions())
        .wrap_err("session key unavailable")?;

    let applied = run_migrations(pool_config.database_url())
        .await
        .wrap_err("database migrations failed")?;
    info!(applied, "database schema up to date");
    let db_pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build connection pool")?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig::new(session, cors, bind_addr, db_pool),
    )?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
