//! Fishing log backend library modules.
//!
//! Hexagonal layout: [`domain`] owns entities, services and ports,
//! [`inbound`] adapts HTTP onto the driving ports, and [`outbound`]
//! implements the driven ports over PostgreSQL and Argon2.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
