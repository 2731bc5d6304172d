//! Domain entities, services and ports.
//!
//! Purpose: own the fishing log's rules independently of HTTP and Diesel.
//! Entities validate themselves on construction, services implement the
//! driving ports, and every store interaction goes through a driven port.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - Account types: [`User`], [`UserId`], [`EmailAddress`], [`Username`],
//!   and the credential inputs in [`auth`].
//! - Log entities: [`Location`], [`FishingSession`], [`Catch`] with their
//!   draft, patch and validated-details companions.
//! - [`StatsSnapshot`] and the statistics rows it produces.
//! - Services: [`PasswordAccountService`], [`LocationService`],
//!   [`FishingSessionService`], [`CatchService`], [`StatsService`].

pub mod account_service;
pub mod auth;
pub mod catch;
pub mod catch_service;
pub mod error;
pub mod fishing_session;
pub mod fishing_session_service;
pub mod location;
pub mod location_service;
pub mod ports;
pub mod stats;
pub mod stats_service;
mod text;
pub mod trace_id;
pub mod user;

pub use self::account_service::PasswordAccountService;
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MIN, PasswordChange, Registration,
};
pub use self::catch::{
    Catch, CatchDetails, CatchDraft, CatchFilter, CatchPatch, CatchValidationError,
};
pub use self::catch_service::CatchService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::fishing_session::{
    FishingSession, FishingSessionDetails, FishingSessionDraft, FishingSessionPatch,
    FishingSessionSummary, FishingSessionValidationError, session_duration_minutes,
};
pub use self::fishing_session_service::FishingSessionService;
pub use self::location::{
    Location, LocationDetails, LocationDraft, LocationPatch, LocationValidationError,
};
pub use self::location_service::LocationService;
pub use self::stats::{
    BaitStats, LocationStats, MonthlyStats, OverviewStats, RecentActivity, SpeciesStats,
    StatsSnapshot,
};
pub use self::stats_service::StatsService;
pub use self::text::TextError;
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserAccount, UserId, UserValidationError, Username};
