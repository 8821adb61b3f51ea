//! One round trip to a chat model

use crate::{Message, ToolDefinition};

/// Output budget used when the caller does not set one
pub const DEFAULT_MAX_TOKENS: usize = 4096;

/// Full conversation plus generation settings for a single completion
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,

    /// Conversation so far, oldest first
    pub messages: Vec<Message>,

    pub system: Option<String>,

    pub max_tokens: usize,

    pub temperature: Option<f32>,

    /// Tools the model may call; `None` disables function calling
    pub tools: Option<Vec<ToolDefinition>>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            system: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            tools: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// `None` leaves the provider default in place
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// An empty list is the same as offering no tools
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = if tools.is_empty() { None } else { Some(tools) };
        self
    }
}

/// Assistant reply with the reason generation stopped
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub message: Message,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Text of the reply, empty when the model only called tools
    pub fn text(&self) -> String {
        self.message.text().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    /// Output budget exhausted; the reply is truncated
    MaxTokens,
    StopSequence,
    ToolUse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_settings() {
        let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("Analyze REE")])
            .with_system("You are a financial analyst")
            .with_max_tokens(2048)
            .with_temperature(Some(0.2));

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.system.as_deref(), Some("You are a financial analyst"));
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.temperature, Some(0.2));
        assert!(request.tools.is_none());
    }

    #[test]
    fn test_defaults() {
        let request = CompletionRequest::new("gpt-4o-mini", Vec::new());
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(request.system.is_none());
        assert!(request.temperature.is_none());
    }

    #[test]
    fn test_empty_tools_disable_function_calling() {
        let none = CompletionRequest::new("m", Vec::new()).with_tools(Vec::new());
        assert!(none.tools.is_none());

        let some = CompletionRequest::new("m", Vec::new()).with_tools(vec![ToolDefinition::new(
            "financial_data_analysis",
            "Analysis frameworks",
            json!({ "type": "object" }),
        )]);
        assert_eq!(some.tools.map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_response_text() {
        let response = CompletionResponse {
            message: Message::assistant("Dividend is covered 3x."),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
        };
        assert_eq!(response.text(), "Dividend is covered 3x.");
        assert_eq!(response.usage.total(), 150);
    }
}
