//! Financial statement analysis
//!
//! Fetches a company's annual statements, derives Levered Free Cash Flow and
//! the Dividend Coverage Ratio, lets an analyst agent write the narrative and
//! persists everything as a markdown report.
//!
//! The pieces can be used on their own:
//! - [`metrics`] derives the cash-flow metrics from a [`StatementTable`]
//! - [`classifier`] and [`templates`] turn a free-text request into an
//!   analysis framework, exposed to agents through [`FinancialAnalysisTool`]
//! - [`report`] writes the final document
//! - [`pipeline`] wires a [`StatementSource`] and an analyst agent together

pub mod agents;
pub mod classifier;
pub mod config;
pub mod error;
pub mod format;
pub mod metrics;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod source;
pub mod statement;
pub mod templates;
pub mod tool;

pub use agents::{FinancialAnalystAgent, TemplateAnalystAgent};
pub use classifier::{AnalysisCategory, Classification, classify};
pub use config::{AnalystConfig, AnalystConfigBuilder};
pub use error::{AnalysisError, Result};
pub use metrics::{DerivedMetric, MetricDeriver};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
pub use report::{ReportAssembler, ReportSections};
pub use source::{AlphaVantageSource, JsonFileSource, SourceKind, StatementSource};
pub use statement::{FinancialStatements, LineItemLabels, StatementKind, StatementRow, StatementTable};
pub use tool::FinancialAnalysisTool;
