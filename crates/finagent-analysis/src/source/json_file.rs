//! Statements from local JSON files
//!
//! Each ticker lives in `{data_dir}/{TICKER}.json`:
//!
//! ```json
//! {
//!   "balance_sheet":    { "periods": ["2023", "2022"], "rows": [{ "label": "Total assets", "values": [1.0, 2.0] }] },
//!   "income_statement": { "periods": ["2023", "2022"], "rows": [] },
//!   "cash_flow":        { "periods": ["2023", "2022"], "rows": [] }
//! }
//! ```

use super::{SourceKind, StatementSource};
use crate::error::{AnalysisError, Result};
use crate::statement::{FinancialStatements, LineItemLabels, StatementTable};
use async_trait::async_trait;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct StatementFile {
    #[serde(default)]
    balance_sheet: StatementTable,
    #[serde(default)]
    income_statement: StatementTable,
    #[serde(default)]
    cash_flow: StatementTable,
}

/// Reads fixtures written with the default (English) line-item labels
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    data_dir: PathBuf,
    labels: LineItemLabels,
}

impl JsonFileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            labels: LineItemLabels::default(),
        }
    }

    /// Use fixtures that follow another provider's labels
    pub fn with_line_items(mut self, labels: LineItemLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{symbol}.json"))
    }
}

#[async_trait]
impl StatementSource for JsonFileSource {
    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn line_items(&self) -> LineItemLabels {
        self.labels.clone()
    }

    async fn fetch(&self, ticker: &str) -> Result<FinancialStatements> {
        let symbol = ticker.to_uppercase();
        let path = self.path_for(&symbol);
        info!(symbol = %symbol, path = %path.display(), "Reading financial data");

        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AnalysisError::DataUnavailable {
                    symbol: symbol.clone(),
                    reason: format!("{} does not exist", path.display()),
                }
            } else {
                AnalysisError::Io(e)
            }
        })?;

        let file: StatementFile = serde_json::from_str(&raw)?;

        Ok(FinancialStatements {
            ticker: symbol,
            source: SourceKind::File,
            balance_sheet: file.balance_sheet,
            income_statement: file.income_statement,
            cash_flow: file.cash_flow,
        })
    }
}
