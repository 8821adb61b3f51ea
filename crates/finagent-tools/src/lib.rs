//! Tool management and execution framework for finagent
//!
//! Tools are the functions an LLM agent may call during its loop. The
//! financial analysis crate registers its query/template tool here.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
