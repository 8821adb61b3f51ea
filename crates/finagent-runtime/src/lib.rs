//! Agent runtime for finagent
//!
//! Provides the [`AgentExecutor`], which drives an LLM provider through the
//! tool-use loop: request, run the tools the model asks for, feed the results
//! back, and stop once the model answers in plain text.

pub mod executor;

pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};
