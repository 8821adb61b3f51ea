//! Statement sources
//!
//! A source fetches the three annual statements for a ticker and declares the
//! row labels its cash flow table uses, so the metric deriver can find the
//! line items it needs.

mod alpha_vantage;
mod json_file;

pub use alpha_vantage::AlphaVantageSource;
pub use json_file::JsonFileSource;

use crate::error::{AnalysisError, Result};
use crate::statement::{FinancialStatements, LineItemLabels};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which source produced a set of statements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Alpha Vantage fundamentals API (requires API key)
    #[default]
    AlphaVantage,
    /// Local JSON fixtures, one file per ticker
    File,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlphaVantage => "alpha-vantage",
            Self::File => "file",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha-vantage" | "alphavantage" | "alpha_vantage" => Ok(Self::AlphaVantage),
            "file" | "json" => Ok(Self::File),
            other => Err(AnalysisError::Config(format!(
                "Unknown statement source '{other}', expected 'alpha-vantage' or 'file'"
            ))),
        }
    }
}

/// Provider of annual financial statements
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatementSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Labels of the cash flow rows the metrics are derived from
    fn line_items(&self) -> LineItemLabels;

    /// Fetch balance sheet, income statement and cash flow for `ticker`
    async fn fetch(&self, ticker: &str) -> Result<FinancialStatements>;
}
