//! Tool exposing the classifier and templates to agents

use crate::classifier::{Classification, classify};
use crate::templates::{HELP_TEXT, render};
use async_trait::async_trait;
use finagent_core::Result as AgentResult;
use finagent_llm::tools::schema;
use finagent_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::panic;
use tracing::{info, warn};

pub const TOOL_NAME: &str = "financial_data_analysis";

const TOOL_DESCRIPTION: &str = "Tool for analyzing financial statements and ratios. Provide type of analysis needed (profitability, liquidity, solvency, cash flow, dividends) and ticker symbol if applicable.";

/// Returns the analysis framework matching a free-text query
///
/// Never fails: anything it cannot handle is answered with the help text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialAnalysisTool;

#[derive(Debug, Deserialize)]
struct AnalysisParams {
    query: String,
}

impl FinancialAnalysisTool {
    pub fn new() -> Self {
        Self
    }

    /// Classify and render a query; the help text on any failure
    pub fn respond(&self, query: &str) -> String {
        let outcome = panic::catch_unwind(|| {
            let Classification { category, ticker } = classify(query);
            info!(
                query = %query,
                category = %category,
                ticker = ticker.as_deref().unwrap_or("None"),
                "Financial analysis requested"
            );
            render(category, ticker.as_deref())
        });

        outcome.unwrap_or_else(|_| {
            warn!(query = %query, "Financial analysis failed, returning help text");
            HELP_TEXT.to_string()
        })
    }
}

#[async_trait]
impl Tool for FinancialAnalysisTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let text = match serde_json::from_value::<AnalysisParams>(params) {
            Ok(params) => self.respond(&params.query),
            Err(e) => {
                warn!(error = %e, "Invalid parameters for financial analysis");
                HELP_TEXT.to_string()
            }
        };
        Ok(Value::String(text))
    }

    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "query": schema::string("Analysis query or specific financial question"),
            }),
            &["query"],
        )
    }
}
