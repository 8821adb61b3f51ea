//! Command-line interface for finagent
//!
//! ```bash
//! # Analyze REE with Alpha Vantage data and an OpenAI model
//! export ALPHA_VANTAGE_API_KEY=...
//! export OPENAI_API_KEY=...
//! finagent REE
//!
//! # Offline run from ./data/VNM.json with the template narrator
//! finagent VNM --source file --narrator template
//!
//! # Ask the analysis tool directly
//! finagent --query "dividend sustainability for ticker: REE"
//! ```

use anyhow::{Context as _, bail};
use clap::{Parser, ValueEnum};
use finagent_analysis::{AnalysisPipeline, AnalystConfig, FinancialAnalysisTool, SourceKind};
use finagent_llm::providers::{OpenAIConfig, OpenAIProvider};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

/// Who writes the analysis narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Narrator {
    /// LLM analyst with the financial analysis tool
    Llm,
    /// Static comprehensive framework, no network access to an LLM
    Template,
}

#[derive(Parser, Debug)]
#[command(name = "finagent")]
#[command(about = "Analyze a company's annual financial statements and write a markdown report", long_about = None)]
struct Args {
    /// Ticker symbol to analyze
    #[arg(default_value = "REE")]
    ticker: String,

    /// Statement source: alpha-vantage or file
    #[arg(long)]
    source: Option<SourceKind>,

    /// Directory with {TICKER}.json files for the file source
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory reports are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Narrative generator
    #[arg(long, value_enum, env = "FINAGENT_NARRATOR", default_value_t = Narrator::Llm)]
    narrator: Narrator,

    /// Chat model for the LLM narrator
    #[arg(long)]
    model: Option<String>,

    /// Print the analysis framework for a free-text request and exit
    #[arg(long, value_name = "TEXT")]
    query: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_config = finagent_utils::Config::from_env().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using default logging");
        finagent_utils::Config::default()
    });
    finagent_utils::init_tracing_with(&log_config);

    if let Some(query) = args.query.as_deref() {
        println!("{}", FinancialAnalysisTool::new().respond(query));
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(path) => {
            println!("\nAnalysis saved to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("An error occurred while running financial analysis: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<PathBuf> {
    let config = build_config(args)?;

    println!("Configuration:");
    println!("  Source: {}", config.source);
    println!("  Output: {}", config.output_dir.display());
    println!("  Narrator: {:?}", args.narrator);
    if args.narrator == Narrator::Llm {
        println!("  Model: {}", config.model);
    }
    println!();

    let pipeline = match args.narrator {
        Narrator::Llm => {
            let provider = Arc::new(build_provider(&config)?);
            AnalysisPipeline::with_llm(&config, provider)?
        }
        Narrator::Template => AnalysisPipeline::with_template(&config)?,
    };

    println!("Retrieving financial data for {}...", args.ticker);
    info!(ticker = %args.ticker, "Starting financial analysis");

    let outcome = pipeline.run(&args.ticker).await?;
    Ok(outcome.report_path)
}

/// Environment first, command-line flags on top
fn build_config(args: &Args) -> anyhow::Result<AnalystConfig> {
    let mut builder = AnalystConfig::builder()
        .base(AnalystConfig::from_env().context("invalid environment configuration")?);

    if let Some(source) = args.source {
        builder = builder.source(source);
    }
    if let Some(dir) = &args.data_dir {
        builder = builder.data_dir(dir);
    }
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }

    Ok(builder.build()?)
}

fn build_provider(config: &AnalystConfig) -> anyhow::Result<OpenAIProvider> {
    let api_key = match (&config.llm_api_key, &config.llm_api_base) {
        (Some(key), _) => key.clone(),
        // Local OpenAI-compatible servers usually ignore the key
        (None, Some(_)) => {
            warn!("OPENAI_API_KEY not set, sending a placeholder key");
            "not-needed".to_string()
        }
        (None, None) => {
            bail!("OPENAI_API_KEY is not set; use --narrator template for an offline run")
        }
    };

    let mut openai = OpenAIConfig::new(api_key).with_timeout(config.request_timeout.as_secs());
    if let Some(base) = &config.llm_api_base {
        openai = openai.with_api_base(base);
    }
    Ok(OpenAIProvider::with_config(openai)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["finagent"]).unwrap();
        assert_eq!(args.ticker, "REE");
        assert_eq!(args.source, None);
        assert!(args.query.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "finagent",
            "VNM",
            "--source",
            "file",
            "--data-dir",
            "fixtures",
            "--narrator",
            "template",
            "--model",
            "gpt-4o",
        ])
        .unwrap();

        assert_eq!(args.ticker, "VNM");
        assert_eq!(args.source, Some(SourceKind::File));
        assert_eq!(args.data_dir, Some(PathBuf::from("fixtures")));
        assert_eq!(args.narrator, Narrator::Template);
        assert_eq!(args.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_unknown_source_rejected() {
        assert!(Args::try_parse_from(["finagent", "--source", "vci"]).is_err());
    }
}
