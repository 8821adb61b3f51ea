//! Markdown report assembly

use crate::error::Result;
use crate::format::format_table;
use crate::statement::{FinancialStatements, StatementKind, StatementTable};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything that goes into a report besides the ticker and timestamp
#[derive(Debug, Clone, Default)]
pub struct ReportSections {
    pub narrative: String,
    pub balance_sheet: StatementTable,
    pub income_statement: StatementTable,
    pub cash_flow: StatementTable,
    pub financial_ratios: StatementTable,
}

impl ReportSections {
    pub fn new(
        narrative: impl Into<String>,
        statements: &FinancialStatements,
        financial_ratios: &StatementTable,
    ) -> Self {
        Self {
            narrative: narrative.into(),
            balance_sheet: statements.table(StatementKind::BalanceSheet).clone(),
            income_statement: statements.table(StatementKind::IncomeStatement).clone(),
            cash_flow: statements.table(StatementKind::CashFlow).clone(),
            financial_ratios: financial_ratios.clone(),
        }
    }

    fn tables(&self) -> [(&'static str, &StatementTable); 4] {
        [
            (StatementKind::BalanceSheet.title(), &self.balance_sheet),
            (StatementKind::IncomeStatement.title(), &self.income_statement),
            (StatementKind::CashFlow.title(), &self.cash_flow),
            ("Financial Ratios", &self.financial_ratios),
        ]
    }
}

/// Writes one markdown file per analysis into an output directory
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    out_dir: PathBuf,
}

impl ReportAssembler {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// `financial_analysis_{TICKER}_{YYYYMMDD_HHMMSS}.md`
    pub fn file_name(ticker: &str, generated_at: &DateTime<Local>) -> String {
        format!(
            "financial_analysis_{ticker}_{}.md",
            generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Report body
    pub fn render(ticker: &str, sections: &ReportSections, generated_at: &DateTime<Local>) -> String {
        let mut doc = format!(
            "# {ticker} Comprehensive Financial Analysis\n\n## Analysis\n{}\n\n## Source Data",
            sections.narrative
        );
        for (title, table) in sections.tables() {
            let _ = write!(doc, "\n\n### {title}\n\n{}", format_table(table));
        }
        let _ = write!(
            doc,
            "\n\n---\n*Generated on {}*\n",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        doc
    }

    /// Write the report and return its path
    ///
    /// Creates the output directory when needed. A report for the same
    /// ticker in the same second replaces the earlier file.
    pub fn assemble(
        &self,
        ticker: &str,
        sections: &ReportSections,
        generated_at: DateTime<Local>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;

        let path = self.out_dir.join(Self::file_name(ticker, &generated_at));
        fs::write(&path, Self::render(ticker, sections, &generated_at))?;

        info!(path = %path.display(), "Analysis saved");
        Ok(path)
    }

    /// [`ReportAssembler::assemble`] stamped with the local clock
    pub fn assemble_now(&self, ticker: &str, sections: &ReportSections) -> Result<PathBuf> {
        self.assemble(ticker, sections, Local::now())
    }
}
