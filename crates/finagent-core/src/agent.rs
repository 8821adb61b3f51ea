//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// An agent turns an instruction plus a [`Context`] into text
///
/// The analysis pipeline treats the narrative writer as an `Agent`: the input
/// is the analysis topic and the context carries the formatted statements.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTicker;

    #[async_trait]
    impl Agent for EchoTicker {
        async fn process(&self, input: String, context: &mut Context) -> Result<String> {
            Ok(format!("{input}:{}", context.ticker().unwrap_or_default()))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_agent_reads_context() {
        let agent: Box<dyn Agent> = Box::new(EchoTicker);
        let mut ctx = Context::new().with_ticker("REE");
        let out = agent.process("topic".to_string(), &mut ctx).await.unwrap();
        assert_eq!(out, "topic:REE");
        assert_eq!(agent.name(), "echo");
    }
}
