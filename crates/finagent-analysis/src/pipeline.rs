//! End-to-end analysis of one ticker
//!
//! fetch statements → derive metrics → format tables into the context →
//! analyst agent → report file.

use crate::agents::{FinancialAnalystAgent, TemplateAnalystAgent};
use crate::config::AnalystConfig;
use crate::error::{AnalysisError, Result};
use crate::format::format_table;
use crate::metrics::MetricDeriver;
use crate::report::{ReportAssembler, ReportSections};
use crate::source::{AlphaVantageSource, JsonFileSource, SourceKind, StatementSource};
use crate::statement::{FinancialStatements, StatementTable};
use chrono::{Datelike, Local};
use finagent_core::context::keys;
use finagent_core::{Agent, Context};
use finagent_llm::LLMProvider;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub report_path: PathBuf,
    pub narrative: String,
}

/// Runs one ticker through source, metrics, agent and report
pub struct AnalysisPipeline {
    source: Arc<dyn StatementSource>,
    agent: Arc<dyn Agent>,
    assembler: ReportAssembler,
    request_timeout: Duration,
}

impl AnalysisPipeline {
    pub fn new(
        source: Arc<dyn StatementSource>,
        agent: Arc<dyn Agent>,
        assembler: ReportAssembler,
        request_timeout: Duration,
    ) -> Self {
        Self {
            source,
            agent,
            assembler,
            request_timeout,
        }
    }

    /// Wire the configured source and report directory around `agent`
    pub fn from_config(config: &AnalystConfig, agent: Arc<dyn Agent>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            build_source(config)?,
            agent,
            ReportAssembler::new(&config.output_dir),
            config.request_timeout,
        ))
    }

    /// Pipeline narrated by the LLM analyst
    pub fn with_llm(config: &AnalystConfig, provider: Arc<dyn LLMProvider>) -> Result<Self> {
        let agent = FinancialAnalystAgent::from_config(provider, config);
        Self::from_config(config, Arc::new(agent))
    }

    /// Pipeline narrated by the offline template analyst
    pub fn with_template(config: &AnalystConfig) -> Result<Self> {
        Self::from_config(config, Arc::new(TemplateAnalystAgent))
    }

    #[instrument(skip(self), fields(source = %self.source.kind(), agent = self.agent.name()))]
    pub async fn run(&self, ticker: &str) -> Result<AnalysisOutcome> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(AnalysisError::Config("ticker must not be empty".to_string()));
        }

        let mut statements = self
            .bounded("statement fetch", self.source.fetch(&ticker))
            .await??;

        let deriver = MetricDeriver::new(self.source.line_items());
        let ratios = deriver.apply(&mut statements.cash_flow);

        let mut context = analysis_context(&ticker, &statements, &ratios);
        let topic = format!("{ticker} Financial Analysis");
        info!(topic = %topic, "Analyzing financial data");

        let narrative = self
            .bounded("financial analysis", self.agent.process(topic, &mut context))
            .await??;

        let sections = ReportSections::new(narrative.clone(), &statements, &ratios);
        let report_path = self.assembler.assemble_now(&ticker, &sections)?;

        Ok(AnalysisOutcome {
            report_path,
            narrative,
        })
    }

    async fn bounded<F: Future>(&self, operation: &str, fut: F) -> Result<F::Output> {
        tokio::time::timeout(self.request_timeout, fut)
            .await
            .map_err(|_| AnalysisError::Timeout {
                operation: operation.to_string(),
                seconds: self.request_timeout.as_secs(),
            })
    }
}

/// Statement source selected by the configuration
pub fn build_source(config: &AnalystConfig) -> Result<Arc<dyn StatementSource>> {
    match config.source {
        SourceKind::AlphaVantage => {
            let key = config.alpha_vantage_api_key.clone().ok_or_else(|| {
                AnalysisError::Config("ALPHA_VANTAGE_API_KEY is not set".to_string())
            })?;
            Ok(Arc::new(AlphaVantageSource::new(key, config.request_timeout)?))
        }
        SourceKind::File => Ok(Arc::new(JsonFileSource::new(&config.data_dir))),
    }
}

/// Context handed to the analyst: topic, ticker, year and formatted tables
pub fn analysis_context(
    ticker: &str,
    statements: &FinancialStatements,
    ratios: &StatementTable,
) -> Context {
    Context::new()
        .with_topic(format!("{ticker} Financial Analysis"))
        .with_ticker(ticker)
        .with_current_year(Local::now().year().to_string())
        .with_text(keys::BALANCE_SHEET, format_table(&statements.balance_sheet))
        .with_text(keys::INCOME_STATEMENT, format_table(&statements.income_statement))
        .with_text(keys::CASH_FLOW, format_table(&statements.cash_flow))
        .with_text(keys::FINANCIAL_RATIOS, format_table(ratios))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{DIVIDEND_COVERAGE_RATIO, LEVERED_FREE_CASH_FLOW};
    use crate::source::MockStatementSource;
    use crate::statement::LineItemLabels;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn statements(ticker: &str) -> FinancialStatements {
        let l = LineItemLabels::default();
        FinancialStatements {
            ticker: ticker.to_string(),
            source: SourceKind::File,
            balance_sheet: StatementTable::new(["2024"]).with_row("Total assets", vec![Some(5000.0)]),
            income_statement: StatementTable::new(["2024"]).with_row("Revenue", vec![Some(900.0)]),
            cash_flow: StatementTable::new(["2024"])
                .with_row(&l.operating_cash_flow, vec![Some(700.0)])
                .with_row(&l.capital_expenditure, vec![Some(100.0)])
                .with_row(&l.dividends_paid, vec![Some(-200.0)]),
        }
    }

    fn source() -> MockStatementSource {
        let mut source = MockStatementSource::new();
        source.expect_kind().return_const(SourceKind::File);
        source
            .expect_line_items()
            .return_const(LineItemLabels::default());
        source
            .expect_fetch()
            .times(1)
            .returning(|ticker| Ok(statements(ticker)));
        source
    }

    /// Records the context it was given
    #[derive(Default)]
    struct RecordingAgent {
        seen: Mutex<Option<(String, Context)>>,
    }

    #[async_trait]
    impl Agent for RecordingAgent {
        async fn process(&self, input: String, context: &mut Context) -> finagent_core::Result<String> {
            *self.seen.lock().unwrap() = Some((input, context.clone()));
            Ok("Narrative body".to_string())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct SlowAgent;

    #[async_trait]
    impl Agent for SlowAgent {
        async fn process(&self, _input: String, _context: &mut Context) -> finagent_core::Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(String::new())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let agent = Arc::new(RecordingAgent::default());
        let pipeline = AnalysisPipeline::new(
            Arc::new(source()),
            agent.clone(),
            ReportAssembler::new(tmp.path()),
            Duration::from_secs(5),
        );

        let outcome = pipeline.run("ree").await.unwrap();

        assert_eq!(outcome.narrative, "Narrative body");
        let file_name = outcome.report_path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("financial_analysis_REE_"));

        let report = std::fs::read_to_string(&outcome.report_path).unwrap();
        assert!(report.starts_with("# REE Comprehensive Financial Analysis\n\n## Analysis\nNarrative body"));
        assert!(report.contains(LEVERED_FREE_CASH_FLOW));
        assert!(report.contains(DIVIDEND_COVERAGE_RATIO));

        let (input, context) = agent.seen.lock().unwrap().clone().unwrap();
        assert_eq!(input, "REE Financial Analysis");
        assert_eq!(context.ticker(), Some("REE"));
        assert_eq!(context.topic(), Some("REE Financial Analysis"));
        assert_eq!(context.current_year(), Some(Local::now().year().to_string().as_str()));
        // LFCF = 700 - 100 = 600, coverage = 600 / 200 = 3
        assert!(context.get_str(keys::CASH_FLOW).unwrap().contains("600"));
        assert!(context.get_str(keys::FINANCIAL_RATIOS).unwrap().contains(DIVIDEND_COVERAGE_RATIO));
    }

    #[tokio::test]
    async fn test_source_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut source = MockStatementSource::new();
        source.expect_kind().return_const(SourceKind::File);
        source.expect_fetch().returning(|ticker| {
            Err(AnalysisError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "missing".to_string(),
            })
        });

        let pipeline = AnalysisPipeline::new(
            Arc::new(source),
            Arc::new(TemplateAnalystAgent),
            ReportAssembler::new(tmp.path().join("out")),
            Duration::from_secs(5),
        );

        let err = pipeline.run("VNM").await.unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
        assert!(!tmp.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_agent_timeout() {
        let tmp = TempDir::new().unwrap();
        let pipeline = AnalysisPipeline::new(
            Arc::new(source()),
            Arc::new(SlowAgent),
            ReportAssembler::new(tmp.path()),
            Duration::from_millis(50),
        );

        let err = pipeline.run("REE").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Timeout { operation, .. } if operation == "financial analysis"));
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let mut source = MockStatementSource::new();
        source.expect_kind().return_const(SourceKind::File);
        source.expect_fetch().never();

        let pipeline = AnalysisPipeline::new(
            Arc::new(source),
            Arc::new(TemplateAnalystAgent),
            ReportAssembler::new("unused"),
            Duration::from_secs(1),
        );
        assert!(matches!(pipeline.run("  ").await, Err(AnalysisError::Config(_))));
    }

    #[tokio::test]
    async fn test_template_pipeline_from_config() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        std::fs::write(
            data.path().join("FPT.json"),
            serde_json::to_string(&serde_json::json!({
                "cash_flow": {
                    "periods": ["2024"],
                    "rows": [{ "label": "Net cash inflows/outflows from operating activities", "values": [10.0] }]
                }
            }))
            .unwrap(),
        )
        .unwrap();

        let config = AnalystConfig::builder()
            .source(SourceKind::File)
            .data_dir(data.path())
            .output_dir(out.path())
            .build()
            .unwrap();

        let outcome = AnalysisPipeline::with_template(&config)
            .unwrap()
            .run("FPT")
            .await
            .unwrap();

        assert!(outcome.narrative.starts_with("# Comprehensive Financial Analysis for FPT "));
        assert!(outcome.report_path.starts_with(out.path()));
    }

    struct RejectingProvider;

    #[async_trait]
    impl LLMProvider for RejectingProvider {
        async fn complete(
            &self,
            _request: finagent_llm::CompletionRequest,
        ) -> finagent_llm::Result<finagent_llm::CompletionResponse> {
            Err(finagent_llm::LLMError::AuthenticationFailed)
        }

        fn name(&self) -> &str {
            "rejecting"
        }
    }

    #[tokio::test]
    async fn test_llm_failure_is_an_agent_error() {
        let tmp = TempDir::new().unwrap();
        let agent = FinancialAnalystAgent::new(
            Arc::new(RejectingProvider),
            finagent_runtime::ExecutorConfig::default(),
        );
        let pipeline = AnalysisPipeline::new(
            Arc::new(source()),
            Arc::new(agent),
            ReportAssembler::new(tmp.path().join("out")),
            Duration::from_secs(5),
        );

        let err = pipeline.run("REE").await.unwrap_err();
        assert!(
            matches!(&err, AnalysisError::Agent(msg) if msg.contains("rejected the credentials")),
            "unexpected error {err:?}"
        );
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn test_build_source_requires_key() {
        let config = AnalystConfig::default();
        assert!(matches!(build_source(&config), Err(AnalysisError::Config(_))));
    }
}
