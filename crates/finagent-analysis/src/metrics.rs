//! Derived cash-flow metrics
//!
//! Levered Free Cash Flow (LFCF) is operating cash flow minus capital
//! expenditure plus disposal proceeds minus net debt repayment. The Dividend
//! Coverage Ratio divides LFCF by the absolute dividends paid.
//!
//! Missing line items never fail a derivation: an absent addend counts as
//! zero and an undefined ratio is `None` for that period.

use crate::statement::{LineItemLabels, StatementTable};
use tracing::debug;

pub const LEVERED_FREE_CASH_FLOW: &str = "Levered Free Cash Flow";
pub const DIVIDEND_COVERAGE_RATIO: &str = "Dividend Coverage Ratio";

/// Named series aligned to the periods of the table it came from
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetric {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Computes derived metrics from a cash flow table
#[derive(Debug, Clone, Default)]
pub struct MetricDeriver {
    labels: LineItemLabels,
}

impl MetricDeriver {
    pub fn new(labels: LineItemLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &LineItemLabels {
        &self.labels
    }

    /// LFCF for every period; always defined
    pub fn levered_free_cash_flow(&self, table: &StatementTable) -> DerivedMetric {
        let l = &self.labels;
        let values = (0..table.periods().len())
            .map(|i| {
                let ocf = table.value_or_zero(&l.operating_cash_flow, i);
                let capex = table.value_or_zero(&l.capital_expenditure, i);
                let disposals = table.value_or_zero(&l.asset_disposals, i);
                let repayments = table.value_or_zero(&l.debt_repayment, i);
                let proceeds = table.value_or_zero(&l.debt_proceeds, i);
                Some(ocf - capex + disposals - (repayments - proceeds))
            })
            .collect();

        DerivedMetric {
            name: LEVERED_FREE_CASH_FLOW.to_string(),
            values,
        }
    }

    /// Dividend Coverage Ratio, or `None` when the table lacks the
    /// dividends-paid or operating-cash-flow row
    pub fn dividend_coverage(
        &self,
        table: &StatementTable,
        lfcf: &DerivedMetric,
    ) -> Option<DerivedMetric> {
        let l = &self.labels;
        if !table.contains_row(&l.dividends_paid) || !table.contains_row(&l.operating_cash_flow) {
            debug!(
                dividends_row = %l.dividends_paid,
                "Skipping dividend coverage ratio, required rows missing"
            );
            return None;
        }

        let values = lfcf
            .values
            .iter()
            .enumerate()
            .map(|(i, lfcf)| {
                let dividends = table.value(&l.dividends_paid, i)?.abs();
                if dividends <= 0.0 {
                    return None;
                }
                lfcf.map(|v| v / dividends)
            })
            .collect();

        Some(DerivedMetric {
            name: DIVIDEND_COVERAGE_RATIO.to_string(),
            values,
        })
    }

    /// All metrics for a cash flow table, LFCF first
    pub fn derive(&self, cash_flow: &StatementTable) -> Vec<DerivedMetric> {
        let lfcf = self.levered_free_cash_flow(cash_flow);
        let coverage = self.dividend_coverage(cash_flow, &lfcf);

        let mut metrics = vec![lfcf];
        metrics.extend(coverage);
        metrics
    }

    /// Append the LFCF row to `cash_flow` and return the ratios table
    ///
    /// The ratios table shares the cash flow periods and has no rows when no
    /// ratio could be derived.
    pub fn apply(&self, cash_flow: &mut StatementTable) -> StatementTable {
        let metrics = self.derive(cash_flow);
        let mut ratios = StatementTable::new(cash_flow.periods().to_vec());

        for metric in metrics {
            if metric.name == LEVERED_FREE_CASH_FLOW {
                cash_flow.push_row(metric.name, metric.values);
            } else {
                ratios.push_row(metric.name, metric.values);
            }
        }
        ratios
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIODS: [&str; 2] = ["2023", "2022"];

    fn labels() -> LineItemLabels {
        LineItemLabels::default()
    }

    fn full_table() -> StatementTable {
        let l = labels();
        StatementTable::new(PERIODS)
            .with_row(&l.operating_cash_flow, vec![Some(1000.0), Some(800.0)])
            .with_row(&l.capital_expenditure, vec![Some(300.0), Some(200.0)])
            .with_row(&l.asset_disposals, vec![Some(50.0), Some(0.0)])
            .with_row(&l.debt_repayment, vec![Some(400.0), Some(100.0)])
            .with_row(&l.debt_proceeds, vec![Some(250.0), Some(100.0)])
            .with_row(&l.dividends_paid, vec![Some(-200.0), Some(0.0)])
    }

    #[test]
    fn test_lfcf_formula() {
        let lfcf = MetricDeriver::default().levered_free_cash_flow(&full_table());
        // 1000 - 300 + 50 - (400 - 250) = 600; 800 - 200 + 0 - 0 = 600
        assert_eq!(lfcf.name, LEVERED_FREE_CASH_FLOW);
        assert_eq!(lfcf.values, vec![Some(600.0), Some(600.0)]);
    }

    #[test]
    fn test_lfcf_missing_items_count_as_zero() {
        let l = labels();
        let table = StatementTable::new(PERIODS)
            .with_row(&l.operating_cash_flow, vec![Some(500.0), None])
            .with_row(&l.debt_proceeds, vec![Some(20.0)]);

        let lfcf = MetricDeriver::default().levered_free_cash_flow(&table);
        assert_eq!(lfcf.values, vec![Some(520.0), Some(0.0)]);
    }

    #[test]
    fn test_lfcf_without_operating_cash_flow_row() {
        let table = StatementTable::new(PERIODS).with_row("Purchase of fixed assets", vec![
            Some(10.0),
            Some(5.0),
        ]);
        let lfcf = MetricDeriver::default().levered_free_cash_flow(&table);
        assert_eq!(lfcf.values, vec![Some(-10.0), Some(-5.0)]);
    }

    #[test]
    fn test_dividend_coverage_uses_absolute_dividends() {
        let deriver = MetricDeriver::default();
        let table = full_table();
        let lfcf = deriver.levered_free_cash_flow(&table);
        let coverage = deriver.dividend_coverage(&table, &lfcf).unwrap();

        assert_eq!(coverage.name, DIVIDEND_COVERAGE_RATIO);
        // 600 / |-200| = 3; zero dividends are undefined
        assert_eq!(coverage.values, vec![Some(3.0), None]);
    }

    #[test]
    fn test_dividend_coverage_absent_cell() {
        let l = labels();
        let table = StatementTable::new(PERIODS)
            .with_row(&l.operating_cash_flow, vec![Some(100.0), Some(100.0)])
            .with_row(&l.dividends_paid, vec![None, Some(50.0)]);
        let deriver = MetricDeriver::default();
        let lfcf = deriver.levered_free_cash_flow(&table);

        let coverage = deriver.dividend_coverage(&table, &lfcf).unwrap();
        assert_eq!(coverage.values, vec![None, Some(2.0)]);
    }

    #[test]
    fn test_dividend_coverage_requires_both_rows() {
        let l = labels();
        let deriver = MetricDeriver::default();

        let no_dividends =
            StatementTable::new(PERIODS).with_row(&l.operating_cash_flow, vec![Some(1.0)]);
        let lfcf = deriver.levered_free_cash_flow(&no_dividends);
        assert!(deriver.dividend_coverage(&no_dividends, &lfcf).is_none());

        let no_ocf = StatementTable::new(PERIODS).with_row(&l.dividends_paid, vec![Some(1.0)]);
        let lfcf = deriver.levered_free_cash_flow(&no_ocf);
        assert!(deriver.dividend_coverage(&no_ocf, &lfcf).is_none());
    }

    #[test]
    fn test_derive_order() {
        let metrics = MetricDeriver::default().derive(&full_table());
        let names: Vec<&str> = metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec![LEVERED_FREE_CASH_FLOW, DIVIDEND_COVERAGE_RATIO]);
    }

    #[test]
    fn test_apply_appends_lfcf_row_and_builds_ratios() {
        let mut cash_flow = full_table();
        let ratios = MetricDeriver::default().apply(&mut cash_flow);

        assert_eq!(
            cash_flow.row(LEVERED_FREE_CASH_FLOW).unwrap().values,
            vec![Some(600.0), Some(600.0)]
        );
        assert_eq!(ratios.periods(), cash_flow.periods());
        assert_eq!(ratios.value(DIVIDEND_COVERAGE_RATIO, 0), Some(3.0));
    }

    #[test]
    fn test_apply_without_dividends_gives_empty_ratios() {
        let mut cash_flow = StatementTable::new(PERIODS);
        let ratios = MetricDeriver::default().apply(&mut cash_flow);

        assert!(ratios.is_empty());
        assert!(cash_flow.contains_row(LEVERED_FREE_CASH_FLOW));
    }

    #[test]
    fn test_custom_labels() {
        let labels = LineItemLabels {
            operating_cash_flow: "operatingCashflow".to_string(),
            capital_expenditure: "capitalExpenditures".to_string(),
            ..LineItemLabels::default()
        };
        let table = StatementTable::new(["2023"])
            .with_row("operatingCashflow", vec![Some(90.0)])
            .with_row("capitalExpenditures", vec![Some(30.0)]);

        let lfcf = MetricDeriver::new(labels).levered_free_cash_flow(&table);
        assert_eq!(lfcf.values, vec![Some(60.0)]);
    }
}
