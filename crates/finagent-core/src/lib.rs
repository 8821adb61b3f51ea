//! Core abstractions for finagent
//!
//! This crate defines the traits and types shared by the agent runtime and the
//! financial analysis crates.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
