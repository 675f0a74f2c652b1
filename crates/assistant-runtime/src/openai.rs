//! OpenAI-Compatible LLM Provider
//!
//! Implementation of `LlmProvider` over the chat-completions wire
//! format with native function calling: tool schemas are bound as
//! `tools`, assistant tool calls round-trip with their ids, and tool
//! turns are sent back with `tool_call_id`.

use std::time::Duration;

use assistant_core::{
    error::{AssistantError, Result},
    provider::{Completion, GenerationOptions, LlmProvider, TokenUsage},
    tool::ToolSchema,
    turn::{ToolCallRequest, Turn},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenAI provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API key (bearer token)
    pub api_key: String,

    /// Base URL of an OpenAI-compatible endpoint
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Read configuration from `OPENAI_API_KEY` and optional
    /// `OPENAI_BASE_URL` environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AssistantError::Config("OPENAI_API_KEY is not set".into()))?;
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());

        Ok(Self {
            api_key,
            base_url,
            timeout_secs: 120,
        })
    }
}

/// OpenAI-compatible LLM provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    /// Convert conversation turns to the wire format
    fn convert_turns(turns: &[Turn]) -> Vec<WireMessage> {
        turns
            .iter()
            .map(|t| WireMessage {
                role: t.role.to_string(),
                content: Some(t.content.clone()),
                tool_call_id: t.tool_call_id.clone(),
                tool_calls: if t.tool_calls.is_empty() {
                    None
                } else {
                    Some(t.tool_calls.iter().map(WireToolCall::from_request).collect())
                },
            })
            .collect()
    }

    /// Convert tool schemas to function-calling bindings
    fn convert_tools(tools: &[ToolSchema]) -> Vec<WireTool> {
        tools
            .iter()
            .map(|schema| WireTool {
                kind: "function".into(),
                function: WireFunction {
                    name: schema.name.clone(),
                    description: schema.description.clone(),
                    parameters: schema.to_json_schema(),
                },
            })
            .collect()
    }

    /// Convert a wire response into a completion.
    ///
    /// A tool call whose argument string is not valid JSON keeps its
    /// id with null arguments, so schema validation reports it per
    /// call and sibling calls still run.
    fn convert_completion(response: WireResponse) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::Provider("response carried no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let arguments = serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                    tracing::warn!(
                        tool = %call.function.name,
                        call_id = %call.id,
                        error = %e,
                        "Malformed tool-call arguments"
                    );
                    serde_json::Value::Null
                });
                ToolCallRequest::new(call.id, call.function.name, arguments)
            })
            .collect();

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    fn map_request_error(e: reqwest::Error) -> AssistantError {
        if e.is_connect() || e.is_timeout() {
            AssistantError::ProviderUnavailable(e.to_string())
        } else {
            AssistantError::Provider(e.to_string())
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        Ok(response.status().is_success())
    }

    async fn complete(
        &self,
        turns: &[Turn],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = WireRequest {
            model: options.model.clone(),
            messages: Self::convert_turns(turns),
            tools: if tools.is_empty() {
                None
            } else {
                Some(Self::convert_tools(tools))
            },
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Provider(format!(
                "HTTP {status}: {body}"
            )));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Provider(e.to_string()))?;

        Self::convert_completion(wire)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: WireFunctionCall,
}

impl WireToolCall {
    fn from_request(call: &ToolCallRequest) -> Self {
        Self {
            id: call.id.clone(),
            kind: "function".into(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// Raw JSON-encoded argument string, as the wire format defines it
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: String,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
