//! Session cookie configuration.
//!
//! Turns the session-related settings into a signing key plus cookie flags,
//! and builds the `actix-session` middleware the API scope is wrapped in.

use std::path::{Path, PathBuf};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

/// Minimum number of bytes accepted in a session key file.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a generated key when the file is missing.
    Debug,
    /// Release builds require a key file unless ephemeral keys are allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fishing_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Inputs for [`session_settings`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// File holding the cookie signing key.
    pub key_file: PathBuf,
    /// Generate a throwaway key when the file cannot be read.
    pub allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
}

/// Validated session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

fn read_key(path: &Path) -> Result<Key, SessionConfigError> {
    let mut bytes = std::fs::read(path).map_err(|source| SessionConfigError::KeyRead {
        path: path.to_path_buf(),
        source,
    })?;
    let length = bytes.len();
    if length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path: path.to_path_buf(),
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

/// Load the signing key and cookie flags.
///
/// A missing or unreadable key file is tolerated in debug builds and when
/// `allow_ephemeral` is set; sessions then do not survive a restart. A key
/// file that is present but too short is always rejected.
///
/// # Errors
/// Returns [`SessionConfigError`] when no usable key is available.
///
/// # Examples
/// ```
/// use fishing_backend::inbound::http::session_config::{
///     BuildMode, SessionOptions, session_settings,
/// };
///
/// let options = SessionOptions {
///     key_file: "/nonexistent/session_key".into(),
///     allow_ephemeral: true,
///     cookie_secure: false,
/// };
/// let settings = session_settings(&options, BuildMode::Release).expect("ephemeral key");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings(
    options: &SessionOptions,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let key = match read_key(&options.key_file) {
        Ok(key) => key,
        Err(SessionConfigError::KeyRead { path, source })
            if mode.is_debug() || options.allow_ephemeral =>
        {
            warn!(
                path = %path.display(),
                error = %source,
                "using temporary session key; sessions will not survive a restart"
            );
            Key::generate()
        }
        Err(err) => return Err(err),
    };
    Ok(SessionSettings {
        key,
        cookie_secure: options.cookie_secure,
    })
}

/// Cookie-backed session middleware: private (encrypted) content,
/// `HttpOnly`, `SameSite=Lax`, two hour persistent lifetime.
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}
