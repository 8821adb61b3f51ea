//! Execution context for agents
//!
//! The `Context` struct is the key-value map handed to the narrative agent:
//! topic, ticker, reporting year and the formatted statement tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys for an analysis run
pub mod keys {
    /// Analysis topic, e.g. "REE Financial Analysis"
    pub const TOPIC: &str = "topic";
    /// Ticker symbol under analysis
    pub const TICKER: &str = "ticker";
    /// Calendar year of the run
    pub const CURRENT_YEAR: &str = "current_year";
    /// Formatted balance sheet
    pub const BALANCE_SHEET: &str = "balance_sheet";
    /// Formatted income statement
    pub const INCOME_STATEMENT: &str = "income_statement";
    /// Formatted cash flow statement
    pub const CASH_FLOW: &str = "cash_flow";
    /// Formatted derived ratios
    pub const FINANCIAL_RATIOS: &str = "financial_ratios";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use finagent_core::Context;
///
/// let ctx = Context::new()
///     .with_topic("REE Financial Analysis")
///     .with_ticker("REE");
///
/// assert_eq!(ctx.ticker(), Some("REE"));
/// assert_eq!(ctx.topic(), Some("REE Financial Analysis"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    // =========== Builder Methods ===========

    /// Set the analysis topic
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.insert_str(keys::TOPIC, topic);
        self
    }

    /// Set the ticker symbol
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.insert_str(keys::TICKER, ticker);
        self
    }

    /// Set the reporting year
    pub fn with_current_year(mut self, year: impl Into<String>) -> Self {
        self.insert_str(keys::CURRENT_YEAR, year);
        self
    }

    /// Set a string value under an arbitrary key
    pub fn with_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert_str(key, text);
        self
    }

    // =========== Common Accessors ===========

    /// Get the analysis topic
    pub fn topic(&self) -> Option<&str> {
        self.get_str(keys::TOPIC)
    }

    /// Get the ticker symbol
    pub fn ticker(&self) -> Option<&str> {
        self.get_str(keys::TICKER)
    }

    /// Get the reporting year
    pub fn current_year(&self) -> Option<&str> {
        self.get_str(keys::CURRENT_YEAR)
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Insert a string value into the context
    pub fn insert_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data
            .insert(key.into(), serde_json::Value::String(value.into()));
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get a string value from the context
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merge another context into this one (other values override)
    pub fn merge(&mut self, other: Context) {
        self.data.extend(other.data);
    }

    /// The whole map as a JSON object, for template rendering
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
