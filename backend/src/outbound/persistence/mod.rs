//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one driven port from
//! [`crate::domain::ports`] over a shared `bb8` pool of `diesel-async`
//! connections.
//!
//! - Row structs (`models.rs`) and the table definitions (`schema.rs`) stay
//!   private; repositories convert rows into validated domain entities.
//! - Every query is scoped to the owning user.
//! - Constraint violations are classified in `diesel_error_mapping.rs` and
//!   surface as the port's typed errors.
//!
//! # Example
//!
//! ```ignore
//! use fishing_backend::outbound::persistence::{DbPool, DieselLocationRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/fishing")).await?;
//! let locations = DieselLocationRepository::new(pool);
//! ```

mod diesel_catch_repository;
mod diesel_error_mapping;
mod diesel_fishing_session_repository;
mod diesel_location_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catch_repository::DieselCatchRepository;
pub use diesel_fishing_session_repository::DieselFishingSessionRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
