//! Analyst agents that turn formatted statements into a narrative

use crate::classifier::AnalysisCategory;
use crate::config::AnalystConfig;
use crate::prompts;
use crate::templates;
use crate::tool::FinancialAnalysisTool;
use async_trait::async_trait;
use finagent_core::context::keys;
use finagent_core::{Agent, Context, Result};
use finagent_llm::LLMProvider;
use finagent_runtime::{AgentExecutor, ExecutorConfig};
use finagent_tools::ToolRegistry;
use std::sync::Arc;
use tracing::info;

/// LLM-backed senior financial analyst
///
/// Each call renders the system and task prompts from the context and runs
/// the tool loop with the [`FinancialAnalysisTool`] available.
pub struct FinancialAnalystAgent {
    provider: Arc<dyn LLMProvider>,
    config: ExecutorConfig,
}

impl FinancialAnalystAgent {
    pub fn new(provider: Arc<dyn LLMProvider>, config: ExecutorConfig) -> Self {
        Self { provider, config }
    }

    /// Executor settings taken from the analysis configuration
    pub fn from_config(provider: Arc<dyn LLMProvider>, config: &AnalystConfig) -> Self {
        Self::new(
            provider,
            ExecutorConfig {
                max_iterations: config.max_iterations,
                model: config.model.clone(),
                system_prompt: None,
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
        )
    }

    fn executor(&self, system_prompt: String) -> Result<AgentExecutor> {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(FinancialAnalysisTool::new()));

        AgentExecutor::builder()
            .provider(self.provider.clone())
            .tool_registry(registry)
            .config(ExecutorConfig {
                system_prompt: Some(system_prompt),
                ..self.config.clone()
            })
            .build()
    }
}

#[async_trait]
impl Agent for FinancialAnalystAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        fill_topic(&input, context);
        info!(
            topic = context.topic().unwrap_or_default(),
            model = %self.config.model,
            "Financial analyst started"
        );

        let system_prompt = prompts::analyst_system_prompt(context)?;
        let task = prompts::analysis_task_prompt(context)?;

        self.executor(system_prompt)?.run(task).await
    }

    fn name(&self) -> &str {
        "financial_analyst"
    }
}

/// Offline analyst that answers with the comprehensive framework
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateAnalystAgent;

#[async_trait]
impl Agent for TemplateAnalystAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        fill_topic(&input, context);
        Ok(templates::render(
            AnalysisCategory::Comprehensive,
            context.ticker(),
        ))
    }

    fn name(&self) -> &str {
        "template_analyst"
    }
}

/// The request doubles as the topic when the context has none
fn fill_topic(input: &str, context: &mut Context) {
    if context.topic().is_none() && !input.trim().is_empty() {
        context.insert_str(keys::TOPIC, input);
    }
}
