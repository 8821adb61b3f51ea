//! Shared utilities for finagent
//!
//! This crate provides the logging setup and the process-level configuration
//! used by the finagent binaries.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat};
pub use logging::init_tracing_with;
