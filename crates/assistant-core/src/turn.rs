//! Conversation Turns
//!
//! Standard message format used across the assistant: one `Turn` per
//! user message, assistant reply, or tool result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a turn's author
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result, correlated to a tool-call request
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A structured action the model asked the orchestrator to perform.
///
/// The `id` is unique within the set of requests from one model response;
/// arguments stay raw and untyped until schema validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Call identifier, echoed back on the correlated tool turn
    pub id: String,

    /// Name of the requested tool
    pub name: String,

    /// Raw arguments as supplied by the model
    pub arguments: serde_json::Value,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A single turn in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    /// Author role
    pub role: Role,

    /// Text content
    pub content: String,

    /// Set only on tool turns: id of the request that produced this result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Non-empty only on assistant turns that propose actions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an assistant turn that proposes tool calls
    pub fn assistant_with_calls(content: impl Into<String>, calls: Vec<ToolCallRequest>) -> Self {
        let mut turn = Self::new(Role::Assistant, content);
        turn.tool_calls = calls;
        turn
    }

    /// Create a tool turn carrying the id of the request it answers
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        let mut turn = Self::new(Role::Tool, content);
        turn.tool_call_id = Some(tool_call_id.into());
        turn
    }
}

/// Ordered turn history with retention utilities
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.push(Turn::system(prompt));
        history
    }

    /// Append a turn at the tail
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Get all turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Get the last turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Drop the oldest non-system turns until at most `limit` remain.
    ///
    /// A leading system turn never counts as droppable: it is the
    /// standing instruction set for the conversation and survives
    /// every trim.
    ///
    /// Tool exchanges are dropped as a unit: a tool turn must not
    /// outlive the assistant turn whose call it answers, since the
    /// chat-completions wire format rejects a tool message with no
    /// preceding assistant tool-call message.
    pub fn trim(&mut self, limit: usize) {
        while self.turns.len() > limit {
            let Some(pos) = self.turns.iter().position(|t| t.role != Role::System) else {
                break;
            };
            let turn = self.turns.remove(pos);
            if turn.role == Role::Assistant && !turn.tool_calls.is_empty() {
                let ids: Vec<&str> = turn.tool_calls.iter().map(|c| c.id.as_str()).collect();
                self.turns.retain(|t| {
                    !(t.role == Role::Tool
                        && t.tool_call_id.as_deref().is_some_and(|id| ids.contains(&id)))
                });
            }
        }
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
