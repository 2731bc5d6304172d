//! Application configuration loaded via OrthoConfig.
//!
//! Every value comes from `FISHING_*` environment variables (or the matching
//! CLI flags and config file keys OrthoConfig layers in). The loaded
//! [`AppSettings`] is immutable and handed explicitly to the pool, the
//! session layer and the server builder.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::inbound::http::session_config::SessionOptions;
use crate::middleware::{CorsConfigError, CorsPolicy};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Configuration problems detected after loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("FISHING_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid bind host {value:?}")]
    InvalidHost { value: String },
    #[error("invalid port {value:?}")]
    InvalidPort { value: String },
    #[error("invalid CORS configuration: {0}")]
    Cors(#[from] CorsConfigError),
}

/// Server, database, CORS and session settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FISHING")]
pub struct AppSettings {
    /// Address to bind, `0.0.0.0` when unset.
    pub host: Option<String>,
    /// Port to bind. Falls back to the platform `PORT`, then 5000.
    pub port: Option<u16>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Connection pool size.
    pub db_max_connections: Option<u32>,
    /// Comma separated CORS allow-list; `*` allows any origin.
    pub allowed_origins: Option<String>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Generate a throwaway key when the key file is missing.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
}

impl AppSettings {
    /// Socket address to bind. `platform_port` is the value of the generic
    /// `PORT` variable many hosts inject; it only applies when
    /// `FISHING_PORT` is unset.
    ///
    /// # Errors
    /// Returns [`SettingsError`] for an unparsable host or fallback port.
    ///
    /// # Examples
    /// ```
    /// use fishing_backend::settings::AppSettings;
    ///
    /// let settings = AppSettings {
    ///     host: Some("127.0.0.1".into()),
    ///     port: None,
    ///     database_url: None,
    ///     db_max_connections: None,
    ///     allowed_origins: None,
    ///     session_key_file: None,
    ///     session_allow_ephemeral: false,
    ///     cookie_secure: true,
    /// };
    /// let addr = settings.bind_addr(Some("8080")).expect("valid address");
    /// assert_eq!(addr.to_string(), "127.0.0.1:8080");
    /// ```
    pub fn bind_addr(&self, platform_port: Option<&str>) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST).trim();
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            value: host.to_owned(),
        })?;
        let port = match (self.port, platform_port) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw.trim().parse().map_err(|_| SettingsError::InvalidPort {
                value: raw.to_owned(),
            })?,
            (None, None) => DEFAULT_PORT,
        };
        Ok(SocketAddr::new(ip, port))
    }

    /// Pool configuration for the configured database.
    ///
    /// # Errors
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no URL is set.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)?;
        Ok(PoolConfig::new(url)
            .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)))
    }

    /// CORS allow-list built from `allowed_origins`.
    ///
    /// # Errors
    /// Returns [`SettingsError::Cors`] for malformed origins.
    pub fn cors_policy(&self) -> Result<CorsPolicy, SettingsError> {
        let raw = self
            .allowed_origins
            .as_deref()
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS);
        Ok(CorsPolicy::from_origins(raw.split(','))?)
    }

    /// Inputs for the session key loader.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE)),
            allow_ephemeral: self.session_allow_ephemeral,
            cookie_secure: self.cookie_secure,
        }
    }
}
