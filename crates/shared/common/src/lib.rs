//! Common utilities shared across the HeartWise crates.
//!
//! This crate provides:
//! - Configuration structures loaded from the environment
//! - Tracing subscriber initialisation

pub mod config;
pub mod telemetry;

pub use config::*;
pub use telemetry::init_tracing;
