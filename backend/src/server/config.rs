//! HTTP server configuration object.

use std::net::SocketAddr;

use fishing_backend::inbound::http::session_config::SessionSettings;
use fishing_backend::middleware::CorsPolicy;
use fishing_backend::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs, resolved from settings.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) cors: CorsPolicy,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        session: SessionSettings,
        cors: CorsPolicy,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            session,
            cors,
            bind_addr,
            db_pool,
        }
    }
}
