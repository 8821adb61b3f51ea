//! Financial statement tables
//!
//! A [`StatementTable`] holds one statement for one company: row labels are
//! the provider's line-item names, columns are fiscal periods and each cell is
//! either a number or absent. Every row always has exactly one cell per
//! period, and non-finite numbers are stored as absent.

use crate::source::SourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three annual statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl StatementKind {
    /// Human readable heading
    pub fn title(self) -> &'static str {
        match self {
            Self::BalanceSheet => "Balance Sheet",
            Self::IncomeStatement => "Income Statement",
            Self::CashFlow => "Cash Flow",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One labelled line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Labelled table of line items by fiscal period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTable")]
pub struct StatementTable {
    periods: Vec<String>,
    rows: Vec<StatementRow>,
}

#[derive(Deserialize)]
struct RawTable {
    #[serde(default)]
    periods: Vec<String>,
    #[serde(default)]
    rows: Vec<StatementRow>,
}

impl From<RawTable> for StatementTable {
    fn from(raw: RawTable) -> Self {
        let mut table = StatementTable::new(raw.periods);
        for row in raw.rows {
            table.push_row(row.label, row.values);
        }
        table
    }
}

impl StatementTable {
    /// Create an empty table over the given periods
    pub fn new<I, S>(periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            periods: periods.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builder form of [`StatementTable::push_row`]
    pub fn with_row(mut self, label: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.push_row(label, values);
        self
    }

    /// Append a row, padding or truncating it to the period count
    ///
    /// A row with an existing label replaces the old one in place.
    pub fn push_row(&mut self, label: impl Into<String>, values: Vec<Option<f64>>) {
        let label = label.into();
        let mut values: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        values.resize(self.periods.len(), None);

        match self.rows.iter_mut().find(|row| row.label == label) {
            Some(existing) => existing.values = values,
            None => self.rows.push(StatementRow { label, values }),
        }
    }

    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    pub fn rows(&self) -> &[StatementRow] {
        &self.rows
    }

    /// Row by exact label
    pub fn row(&self, label: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    pub fn contains_row(&self, label: &str) -> bool {
        self.row(label).is_some()
    }

    /// Cell value; `None` when the row or the cell is absent
    pub fn value(&self, label: &str, period: usize) -> Option<f64> {
        self.row(label)
            .and_then(|row| row.values.get(period).copied().flatten())
    }

    /// Cell value with absence treated as zero
    pub fn value_or_zero(&self, label: &str, period: usize) -> f64 {
        self.value(label, period).unwrap_or(0.0)
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The three statements for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub ticker: String,
    pub source: SourceKind,
    pub balance_sheet: StatementTable,
    pub income_statement: StatementTable,
    pub cash_flow: StatementTable,
}

impl FinancialStatements {
    pub fn table(&self, kind: StatementKind) -> &StatementTable {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::IncomeStatement => &self.income_statement,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }
}

/// Exact row labels the metric deriver reads from a cash flow table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemLabels {
    pub operating_cash_flow: String,
    pub capital_expenditure: String,
    pub asset_disposals: String,
    pub debt_repayment: String,
    pub debt_proceeds: String,
    pub dividends_paid: String,
}

impl Default for LineItemLabels {
    fn default() -> Self {
        Self {
            operating_cash_flow: "Net cash inflows/outflows from operating activities".to_string(),
            capital_expenditure: "Purchase of fixed assets".to_string(),
            asset_disposals: "Proceeds from disposal of fixed assets".to_string(),
            debt_repayment: "Repayment of borrowings".to_string(),
            debt_proceeds: "Proceeds from borrowings".to_string(),
            dividends_paid: "Dividends paid".to_string(),
        }
    }
}
