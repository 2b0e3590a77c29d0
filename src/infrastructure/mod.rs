//! Infrastructure layer modules
//!
//! This module contains shared infrastructure components:
//! - `config`: Connection and retry settings loaded from the environment
//! - `error`: Probe error type and failure classification
//! - `postgres`: PostgreSQL implementation of the probe backend

pub mod config;
pub mod error;
pub mod postgres;
