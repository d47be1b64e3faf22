//! # warta-core
//!
//! Core crate for the Warta notification hub. Contains the unified error
//! system, typed identifiers, shared value objects, configuration schemas,
//! and the telemetry bootstrap.
//!
//! This crate has **no** internal dependencies on other Warta crates.

pub mod config;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
