//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by the
//! outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`AccountService`]) are implemented by the domain services and consumed
//! by the HTTP handlers.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod catch_command;
mod catch_query;
mod catch_repository;
mod fishing_session_command;
mod fishing_session_query;
mod fishing_session_repository;
mod location_command;
mod location_query;
mod location_repository;
mod password_hasher;
mod stats_query;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use catch_command::MockCatchCommand;
pub use catch_command::CatchCommand;
#[cfg(test)]
pub use catch_query::MockCatchQuery;
pub use catch_query::CatchQuery;
#[cfg(test)]
pub use catch_repository::MockCatchRepository;
pub use catch_repository::{CatchRepository, CatchRepositoryError};
#[cfg(test)]
pub use fishing_session_command::MockFishingSessionCommand;
pub use fishing_session_command::FishingSessionCommand;
#[cfg(test)]
pub use fishing_session_query::MockFishingSessionQuery;
pub use fishing_session_query::{FishingSessionQuery, FishingSessionWithCatches};
#[cfg(test)]
pub use fishing_session_repository::MockFishingSessionRepository;
pub use fishing_session_repository::{
    FishingSessionFilter, FishingSessionRepository, FishingSessionRepositoryError,
};
#[cfg(test)]
pub use location_command::MockLocationCommand;
pub use location_command::LocationCommand;
#[cfg(test)]
pub use location_query::MockLocationQuery;
pub use location_query::LocationQuery;
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::{LocationDeletion, LocationRepository, LocationRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use stats_query::MockStatsQuery;
pub use stats_query::StatsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
