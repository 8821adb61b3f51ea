//! Prompt templates for the financial analyst agent
//!
//! Rendered with MiniJinja from the run [`Context`]; keys that are not set
//! render as empty strings.

use crate::error::Result;
use finagent_core::Context;
use minijinja::{Environment, Value};

const ANALYST_SYSTEM: &str = r"You are a Senior Financial Analyst{% if ticker %} covering {{ ticker }}{% endif %}.

Goal: produce an insightful, evidence-based analysis of the company's financial statements that an investor can act on.

Backstory: you have spent years reading balance sheets, income statements and cash flow statements of listed companies. You are known for connecting the three statements, spotting changes in earnings quality early and judging whether dividends are sustainable from free cash flow rather than from reported profit.

You have a financial analysis tool. Call it with a short request such as 'dividend analysis for ticker: REE' to get the framework for a profitability, liquidity, solvency, cash flow, dividend or comprehensive analysis, then apply that framework to the figures you are given.

Work only from the provided data. When a figure is missing, say so instead of estimating it.";

const ANALYSIS_TASK: &str = r"Conduct a comprehensive analysis of the financial statements below for {{ topic }}.

Ticker: {{ ticker }}
Current year: {{ current_year }}

Balance Sheet:
{{ balance_sheet }}

Income Statement:
{{ income_statement }}

Cash Flow Statement:
{{ cash_flow }}

Financial Ratios:
{{ financial_ratios }}

Cover:
1. Asset composition, liabilities and equity structure
2. Profitability: margins, ROCE, ROE and ROIC
3. Cash flow quality and trends, including Levered Free Cash Flow
4. Liquidity and solvency
5. Working capital management
6. Significant year-over-year changes
7. How the three statements connect
8. Dividend sustainability, using the Dividend Coverage Ratio

Write the result as a markdown report with a section per topic, cite the figures you rely on and finish with a short list of key takeaways.";

fn render(template: &str, context: &Context) -> Result<String> {
    let env = Environment::new();
    let rendered = env.render_str(template, Value::from_serialize(context.to_value()))?;
    Ok(rendered)
}

/// System prompt describing the analyst's role, goal and backstory
pub fn analyst_system_prompt(context: &Context) -> Result<String> {
    render(ANALYST_SYSTEM, context)
}

/// Task prompt embedding the formatted statements
pub fn analysis_task_prompt(context: &Context) -> Result<String> {
    render(ANALYSIS_TASK, context)
}
