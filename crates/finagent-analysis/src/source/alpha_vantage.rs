//! Alpha Vantage fundamentals client

use super::{SourceKind, StatementSource};
use crate::error::{AnalysisError, Result};
use crate::statement::{FinancialStatements, LineItemLabels, StatementTable};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Fields that describe a report rather than a line item
const META_FIELDS: &[&str] = &["fiscalDateEnding", "reportedCurrency"];

/// Annual statements from the Alpha Vantage `BALANCE_SHEET`,
/// `INCOME_STATEMENT` and `CASH_FLOW` functions
#[derive(Debug, Clone)]
pub struct AlphaVantageSource {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageSource {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn statement(&self, function: &str, symbol: &str) -> Result<StatementTable> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", function),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalysisError::Api(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        check_error_payload(&data)?;

        let table = parse_annual_reports(&data).ok_or_else(|| AnalysisError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("no annual reports in {function} response"),
        })?;

        debug!(
            periods = table.periods().len(),
            rows = table.rows().len(),
            "Parsed annual reports"
        );
        Ok(table)
    }
}

#[async_trait]
impl StatementSource for AlphaVantageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::AlphaVantage
    }

    /// Alpha Vantage reports no separate disposal or repayment lines; those
    /// labels never match and contribute zero.
    fn line_items(&self) -> LineItemLabels {
        LineItemLabels {
            operating_cash_flow: "operatingCashflow".to_string(),
            capital_expenditure: "capitalExpenditures".to_string(),
            asset_disposals: "proceedsFromSaleOfFixedAssets".to_string(),
            debt_repayment: "paymentsForRepaymentOfDebt".to_string(),
            debt_proceeds: "proceedsFromIssuanceOfLongTermDebtAndCapitalSecuritiesNet".to_string(),
            dividends_paid: "dividendPayout".to_string(),
        }
    }

    async fn fetch(&self, ticker: &str) -> Result<FinancialStatements> {
        let symbol = ticker.to_uppercase();
        info!(symbol = %symbol, "Retrieving financial data");

        let balance_sheet = self.statement("BALANCE_SHEET", &symbol).await?;
        let income_statement = self.statement("INCOME_STATEMENT", &symbol).await?;
        let cash_flow = self.statement("CASH_FLOW", &symbol).await?;

        Ok(FinancialStatements {
            ticker: symbol,
            source: SourceKind::AlphaVantage,
            balance_sheet,
            income_statement,
            cash_flow,
        })
    }
}

fn check_error_payload(data: &Value) -> Result<()> {
    for key in ["Error Message", "Note", "Information"] {
        if let Some(message) = data.get(key) {
            let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
            return Err(AnalysisError::Api(message));
        }
    }
    Ok(())
}

/// Columns are fiscal years, newest first as delivered
fn parse_annual_reports(data: &Value) -> Option<StatementTable> {
    let reports = data.get("annualReports")?.as_array()?;
    if reports.is_empty() {
        return None;
    }

    let periods: Vec<String> = reports
        .iter()
        .map(|r| {
            r.get("fiscalDateEnding")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    let mut labels: Vec<&str> = Vec::new();
    for report in reports {
        for key in report.as_object().into_iter().flat_map(|obj| obj.keys()) {
            let key = key.as_str();
            if !META_FIELDS.contains(&key) && !labels.contains(&key) {
                labels.push(key);
            }
        }
    }

    let mut table = StatementTable::new(periods);
    for label in labels {
        let values = reports.iter().map(|r| parse_number(r.get(label))).collect();
        table.push_row(label, values);
    }
    Some(table)
}

/// Values arrive as strings; "None" and anything unparsable are absent
fn parse_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
