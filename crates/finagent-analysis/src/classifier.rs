//! Free-text request classification
//!
//! Maps a query to one of six analysis categories by keyword and pulls an
//! optional ticker symbol out of it. Both are heuristics: any 3-4 letter
//! uppercase acronym can be picked up as a ticker.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Checked in this order; the first category with a hit wins
const PROFITABILITY_KEYWORDS: &[&str] = &["profit", "margin", "earnings", "roe", "roa", "eps"];
const LIQUIDITY_KEYWORDS: &[&str] = &["liquid", "current ratio", "quick ratio", "working capital"];
const SOLVENCY_KEYWORDS: &[&str] = &["solv", "debt", "leverage", "interest coverage"];
const CASH_FLOW_KEYWORDS: &[&str] = &["cash flow", "ocf", "fcf", "operating cash"];
const DIVIDEND_KEYWORDS: &[&str] = &["dividend", "payout", "yield"];

static EXPLICIT_TICKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(?:ticker|symbol)\s*[:\-]?\s*([A-Z]{3,4})\b").ok());

static BARE_TICKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{3,4}\b").ok());

/// Topical bucket used to pick an analysis template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisCategory {
    Profitability,
    Liquidity,
    Solvency,
    CashFlow,
    Dividend,
    #[default]
    Comprehensive,
}

impl AnalysisCategory {
    pub const ALL: [AnalysisCategory; 6] = [
        Self::Profitability,
        Self::Liquidity,
        Self::Solvency,
        Self::CashFlow,
        Self::Dividend,
        Self::Comprehensive,
    ];

    /// Canonical lower-case name
    pub fn name(self) -> &'static str {
        match self {
            Self::Profitability => "profitability",
            Self::Liquidity => "liquidity",
            Self::Solvency => "solvency",
            Self::CashFlow => "cash_flow",
            Self::Dividend => "dividend",
            Self::Comprehensive => "comprehensive",
        }
    }

    /// Category by canonical name; anything else is comprehensive
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Profitability => PROFITABILITY_KEYWORDS,
            Self::Liquidity => LIQUIDITY_KEYWORDS,
            Self::Solvency => SOLVENCY_KEYWORDS,
            Self::CashFlow => CASH_FLOW_KEYWORDS,
            Self::Dividend => DIVIDEND_KEYWORDS,
            Self::Comprehensive => &[],
        }
    }
}

impl fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of classifying a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: AnalysisCategory,
    pub ticker: Option<String>,
}

/// Classify a free-text request
pub fn classify(query: &str) -> Classification {
    Classification {
        category: detect_category(query),
        ticker: extract_ticker(query),
    }
}

/// Keyword match on the lower-cased query
pub fn detect_category(query: &str) -> AnalysisCategory {
    let query = query.to_lowercase();
    AnalysisCategory::ALL
        .into_iter()
        .find(|category| matches_any(&query, category.keywords()))
        .unwrap_or_default()
}

/// Explicit `ticker:`/`symbol:` mention first, then the first bare
/// 3-4 letter uppercase word
pub fn extract_ticker(query: &str) -> Option<String> {
    let explicit = EXPLICIT_TICKER
        .as_ref()
        .and_then(|re| re.captures(query))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase());

    explicit.or_else(|| {
        BARE_TICKER
            .as_ref()
            .and_then(|re| re.find(query))
            .map(|m| m.as_str().to_string())
    })
}

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
