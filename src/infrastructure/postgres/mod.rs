//! PostgreSQL backend for the probe.
//!
//! Opens a single connection per attempt and runs the verification
//! queries against it.

pub mod connection;

pub use connection::{connect_options, display_target, PostgresBackend, PostgresSession};
