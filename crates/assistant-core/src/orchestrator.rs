//! Turn Orchestrator
//!
//! Drives one inbound message through the pipeline: load/create the
//! session, append the user turn, call the model once with the trimmed
//! history and the tool list, execute every proposed tool call in
//! request order, and fold the results into the reply.
//!
//! Per inbound message the state machine is
//! `Idle → AwaitingModel → (NoToolCalls → Reply)` or
//! `(HasToolCalls → ExecutingTools → Reply) → Idle`, with the single
//! suspension point being the model call.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::executor::ToolExecutor;
use crate::provider::{Completion, GenerationOptions, LlmProvider};
use crate::session::{SessionId, SessionStore};
use crate::tool::{ToolRegistry, ToolResult, ToolSchema};
use crate::turn::Turn;

/// Fixed degraded reply when the model cannot be reached
pub const APOLOGY_REPLY: &str = "Произошла ошибка при обращении к AI 😔";

/// Fixed reply when the model answers with no content and no tool calls
pub const EMPTY_COMPLETION_REPLY: &str = "Ошибка в ответе от ChatGPT";

/// Inbound event consumed by the core
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    /// Conversation identity (one session per chat)
    pub session_id: String,

    /// The user's message text
    pub text: String,
}

/// Outbound reply produced by the core
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub session_id: String,
    pub text: String,
}

/// Orchestrator configuration
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Leading system turn seeded into every new session
    pub system_prompt: String,

    /// Retention bound: oldest non-system turns are dropped past this
    pub history_limit: usize,

    /// Generation options passed to the provider
    pub generation: GenerationOptions,

    /// Optional bound on the model call; `None` means no timeout
    pub model_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            history_limit: 30,
            generation: GenerationOptions::default(),
            model_timeout: None,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "Ты ассистент-менеджер проектов. \
Помогаешь планировать работу: разбиваешь запросы на задачи, сохраняешь их \
и ищешь существующие. Для создания и поиска задач всегда используй \
доступные инструменты, не выдумывай данные. Отвечай кратко и по делу.";

/// The turn orchestrator
pub struct Orchestrator {
    provider: Arc<dyn LlmProvider>,
    executor: ToolExecutor,
    sessions: SessionStore,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        registry: Arc<ToolRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        let sessions = SessionStore::with_system_prompt(config.system_prompt.clone());
        Self {
            provider,
            executor: ToolExecutor::new(registry),
            sessions,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, registry: Arc<ToolRegistry>) -> Self {
        Self::new(provider, registry, OrchestratorConfig::default())
    }

    /// The session store (for inspection; sessions are owned here)
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Get configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Process one inbound message and produce the reply.
    ///
    /// Infallible: every failure degrades to a reply, never a crash.
    /// The session lock is held for the whole turn, so a second message
    /// for the same conversation waits until this one is finished while
    /// other conversations proceed in parallel.
    pub async fn handle(&self, inbound: Inbound) -> Reply {
        let session_id = SessionId::from(inbound.session_id.clone());
        let session_ref = self.sessions.get_or_create(&session_id);
        let mut session = session_ref.lock().await;

        session.push(Turn::user(&inbound.text));

        // Trim happens only here, before the model call: at this point
        // no tool-call request is awaiting its correlated result.
        session.history.trim(self.config.history_limit);

        let schemas = self.executor.registry().schemas();
        let completion = match self.call_model(session.history.turns(), &schemas).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::error!(session = %session_id, error = %e, "Model call failed");
                // The apology is appended as the answering assistant
                // turn, so the user turn is never left dangling.
                let text = e.user_message();
                session.push(Turn::assistant(&text));
                return Reply {
                    session_id: inbound.session_id,
                    text,
                };
            }
        };

        let text = if completion.has_tool_calls() {
            self.run_tool_calls(&mut session, completion).await
        } else {
            let text = if completion.content.trim().is_empty() {
                tracing::warn!(session = %session_id, "Model returned an empty completion");
                EMPTY_COMPLETION_REPLY.to_string()
            } else {
                completion.content
            };
            session.push(Turn::assistant(&text));
            text
        };

        tracing::debug!(session = %session_id, turns = session.turn_count(), "Turn complete");

        Reply {
            session_id: inbound.session_id,
            text,
        }
    }

    /// Single model call, optionally bounded by the configured timeout
    async fn call_model(&self, turns: &[Turn], tools: &[ToolSchema]) -> Result<Completion> {
        let call = self.provider.complete(turns, tools, &self.config.generation);

        match self.config.model_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                crate::error::AssistantError::ProviderUnavailable(format!(
                    "model call timed out after {timeout:?}"
                ))
            })?,
            None => call.await,
        }
    }

    /// Execute every proposed call sequentially in request order; each
    /// result becomes one correlated tool turn. One call's failure
    /// never prevents its siblings from running.
    async fn run_tool_calls(
        &self,
        session: &mut crate::session::Session,
        completion: Completion,
    ) -> String {
        session.push(Turn::assistant_with_calls(
            &completion.content,
            completion.tool_calls.clone(),
        ));

        let mut results = Vec::with_capacity(completion.tool_calls.len());
        for call in &completion.tool_calls {
            tracing::debug!(tool = %call.name, call_id = %call.id, "Executing tool");
            let result = self.executor.run(call).await;
            session.push(Turn::tool(&result.output, &result.call_id));
            results.push(result);
        }

        // Reply composition: tool results are returned verbatim, in
        // request order, prefixed by any model content. No second
        // model call.
        let reply = compose_reply(&completion.content, &results);
        session.push(Turn::assistant(&reply));
        reply
    }
}

fn compose_reply(content: &str, results: &[ToolResult]) -> String {
    let mut parts = Vec::with_capacity(results.len() + 1);
    if !content.trim().is_empty() {
        parts.push(content.trim().to_string());
    }
    for result in results {
        parts.push(result.output.clone());
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssistantError, Result};
    use crate::provider::TokenUsage;
    use crate::tool::{ParameterSchema, Tool, ToolSchema};
    use crate::turn::{Role, ToolCallRequest};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Provider double fed with a script of responses
    struct MockProvider {
        script: Mutex<VecDeque<Result<Completion>>>,
    }

    impl MockProvider {
        fn scripted(responses: Vec<Result<Completion>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(responses.into_iter().collect()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _turns: &[Turn],
            _tools: &[ToolSchema],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(Completion {
                        content: "default".into(),
                        tool_calls: Vec::new(),
                        model: options.model.clone(),
                        usage: None,
                    })
                })
        }
    }

    fn completion(content: &str, tool_calls: Vec<ToolCallRequest>) -> Completion {
        Completion {
            content: content.into(),
            tool_calls,
            model: "mock".into(),
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        }
    }

    struct GreeterTool;

    #[async_trait]
    impl Tool for GreeterTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "greet".into(),
                description: "Greets someone".into(),
                parameters: vec![
                    ParameterSchema::new("name", "string", "Who to greet")
                        .required()
                        .with_min_length(1),
                ],
            }
        }

        async fn execute(&self, arguments: &serde_json::Value) -> Result<String> {
            Ok(format!(
                "Привет, {}!",
                arguments["name"].as_str().unwrap_or_default()
            ))
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(GreeterTool);
        Arc::new(registry)
    }

    fn inbound(text: &str) -> Inbound {
        Inbound {
            session_id: "chat-1".into(),
            text: text.into(),
        }
    }

    async fn session_roles(orchestrator: &Orchestrator) -> Vec<Role> {
        let session = orchestrator
            .sessions()
            .get(&SessionId::new("chat-1"))
            .unwrap();
        let session = session.lock().await;
        session.history.turns().iter().map(|t| t.role.clone()).collect()
    }

    #[tokio::test]
    async fn test_plain_reply_without_tool_calls() {
        let provider = MockProvider::scripted(vec![Ok(completion("Здравствуйте!", vec![]))]);
        let orchestrator = Orchestrator::with_defaults(provider, registry());

        let reply = orchestrator.handle(inbound("привет")).await;

        assert_eq!(reply.text, "Здравствуйте!");
        assert_eq!(
            session_roles(&orchestrator).await,
            vec![Role::System, Role::User, Role::Assistant]
        );
    }

    #[tokio::test]
    async fn test_empty_completion_falls_back_to_fixed_reply() {
        let provider = MockProvider::scripted(vec![Ok(completion("  ", vec![]))]);
        let orchestrator = Orchestrator::with_defaults(provider, registry());

        let reply = orchestrator.handle(inbound("привет")).await;

        assert_eq!(reply.text, EMPTY_COMPLETION_REPLY);
        // The fallback is stored as the answering assistant turn
        let session = orchestrator
            .sessions()
            .get(&SessionId::new("chat-1"))
            .unwrap();
        let session = session.lock().await;
        assert_eq!(
            session.history.last().unwrap().content,
            EMPTY_COMPLETION_REPLY
        );
    }

    #[tokio::test]
    async fn test_tool_calls_run_in_request_order() {
        let calls = vec![
            ToolCallRequest::new("call_1", "greet", json!({"name": "Анна"})),
            ToolCallRequest::new("call_2", "greet", json!({"name": "Борис"})),
        ];
        let provider = MockProvider::scripted(vec![Ok(completion("", calls))]);
        let orchestrator = Orchestrator::with_defaults(provider, registry());

        let reply = orchestrator.handle(inbound("поздоровайся")).await;

        assert_eq!(reply.text, "Привет, Анна!\nПривет, Борис!");
        assert_eq!(
            session_roles(&orchestrator).await,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::Tool,
                Role::Tool,
                Role::Assistant,
            ]
        );

        // Tool turns are correlated, in request order
        let session = orchestrator
            .sessions()
            .get(&SessionId::new("chat-1"))
            .unwrap();
        let session = session.lock().await;
        let tool_ids: Vec<_> = session
            .history
            .turns()
            .iter()
            .filter_map(|t| t.tool_call_id.clone())
            .collect();
        assert_eq!(tool_ids, vec!["call_1", "call_2"]);
    }

    #[tokio::test]
    async fn test_failed_call_does_not_block_siblings() {
        let calls = vec![
            ToolCallRequest::new("call_1", "nonexistent", json!({})),
            ToolCallRequest::new("call_2", "greet", json!({"name": "Вера"})),
        ];
        let provider = MockProvider::scripted(vec![Ok(completion("", calls))]);
        let orchestrator = Orchestrator::with_defaults(provider, registry());

        let reply = orchestrator.handle(inbound("сделай два вызова")).await;

        assert!(reply.text.contains("unknown tool: nonexistent"));
        assert!(reply.text.contains("Привет, Вера!"));

        // Both requests yielded exactly one correlated result
        let roles = session_roles(&orchestrator).await;
        assert_eq!(roles.iter().filter(|r| **r == Role::Tool).count(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_apology() {
        let provider = MockProvider::scripted(vec![Err(AssistantError::ProviderUnavailable(
            "connection refused".into(),
        ))]);
        let orchestrator = Orchestrator::with_defaults(provider, registry());

        let reply = orchestrator.handle(inbound("привет")).await;

        assert_eq!(reply.text, APOLOGY_REPLY);
        // The user turn is answered, nothing is left dangling
        assert_eq!(
            session_roles(&orchestrator).await,
            vec![Role::System, Role::User, Role::Assistant]
        );
    }

    #[tokio::test]
    async fn test_model_timeout_surfaces_as_apology() {
        struct StalledProvider;

        #[async_trait]
        impl LlmProvider for StalledProvider {
            async fn health_check(&self) -> Result<bool> {
                Ok(true)
            }

            async fn complete(
                &self,
                _turns: &[Turn],
                _tools: &[ToolSchema],
                _options: &GenerationOptions,
            ) -> Result<Completion> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                unreachable!("the timeout must fire first")
            }
        }

        let config = OrchestratorConfig {
            model_timeout: Some(Duration::from_millis(10)),
            ..Default::default()
        };
        let orchestrator = Orchestrator::new(Arc::new(StalledProvider), registry(), config);

        let reply = orchestrator.handle(inbound("привет")).await;
        assert_eq!(reply.text, APOLOGY_REPLY);
    }

    #[tokio::test]
    async fn test_history_is_trimmed_to_limit() {
        let mut script = Vec::new();
        for i in 0..6 {
            script.push(Ok(completion(&format!("ответ {i}"), vec![])));
        }
        let config = OrchestratorConfig {
            history_limit: 5,
            ..Default::default()
        };
        let provider = MockProvider::scripted(script);
        let orchestrator = Orchestrator::new(provider, registry(), config);

        for i in 0..6 {
            orchestrator.handle(inbound(&format!("вопрос {i}"))).await;
        }

        let session = orchestrator
            .sessions()
            .get(&SessionId::new("chat-1"))
            .unwrap();
        let session = session.lock().await;
        // Trim runs before each model call; the final assistant turn
        // may push the count one past the bound until the next turn.
        assert!(session.turn_count() <= 6);
        assert_eq!(session.history.turns()[0].role, Role::System);
    }

    #[tokio::test]
    async fn test_trim_never_orphans_tool_turns() {
        let script = vec![
            Ok(completion(
                "",
                vec![ToolCallRequest::new(
                    "call_1",
                    "greet",
                    json!({"name": "Анна"}),
                )],
            )),
            Ok(completion("ответ 1", vec![])),
            Ok(completion("ответ 2", vec![])),
        ];
        let config = OrchestratorConfig {
            history_limit: 6,
            ..Default::default()
        };
        let provider = MockProvider::scripted(script);
        let orchestrator = Orchestrator::new(provider, registry(), config);

        // The third turn forces the tool exchange out of the window
        orchestrator.handle(inbound("поздоровайся")).await;
        orchestrator.handle(inbound("вопрос 1")).await;
        orchestrator.handle(inbound("вопрос 2")).await;

        let session = orchestrator
            .sessions()
            .get(&SessionId::new("chat-1"))
            .unwrap();
        let session = session.lock().await;
        // Every surviving tool turn must still have the assistant turn
        // that requested it; the wire format rejects a tool message
        // with no preceding tool-call message.
        let proposed: Vec<&str> = session
            .history
            .turns()
            .iter()
            .flat_map(|t| t.tool_calls.iter().map(|c| c.id.as_str()))
            .collect();
        for turn in session.history.turns() {
            if let Some(id) = turn.tool_call_id.as_deref() {
                assert!(proposed.contains(&id), "tool turn {id} lost its proposer");
            }
        }
    }
}
