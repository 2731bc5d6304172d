//! Request middleware: trace-id scoping and the CORS allow-list.

pub mod cors;
pub mod trace;

pub use cors::{CorsConfigError, CorsPolicy};
pub use trace::Trace;
