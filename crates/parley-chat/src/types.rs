//! Core types for chat conversations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque unique message identifier, assigned by the store at append time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap a raw id string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the raw id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// Lifecycle of a simulated tool call.
///
/// Progression is monotonic: an invocation never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolCallState {
    PartialCall,
    Call,
    Result,
}

/// A structured record of a simulated function/tool call and its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Identifier of the invoked capability
    pub tool_name: String,
    /// Unique id correlating call and result
    pub tool_call_id: String,
    /// Opaque payload supplied to the tool
    pub args: serde_json::Value,
    /// Current lifecycle state
    pub state: ToolCallState,
    /// Present iff `state == Result`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl ToolInvocation {
    /// Create an invocation in the pending `Call` state
    pub fn call(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        args: serde_json::Value,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_call_id: tool_call_id.into(),
            args,
            state: ToolCallState::Call,
            result: None,
        }
    }

    /// Create a completed invocation carrying its result
    pub fn completed(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        args: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_call_id: tool_call_id.into(),
            args,
            state: ToolCallState::Result,
            result: Some(result),
        }
    }

    /// Copy of this invocation rolled back to the pending `Call` state,
    /// result withheld. Used when storing a call whose result arrives later.
    pub fn as_call(&self) -> Self {
        Self {
            tool_name: self.tool_name.clone(),
            tool_call_id: self.tool_call_id.clone(),
            args: self.args.clone(),
            state: ToolCallState::Call,
            result: None,
        }
    }

    /// Advance to `Result` with the given payload.
    ///
    /// Returns `false` without touching the record if it already holds a
    /// result (state never regresses).
    pub fn complete(&mut self, result: serde_json::Value) -> bool {
        if self.state == ToolCallState::Result {
            return false;
        }
        self.state = ToolCallState::Result;
        self.result = Some(result);
        true
    }
}

/// A single conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Assigned at append time
    pub id: MessageId,
    pub role: Role,
    /// Text payload; replaced wholesale while streaming
    pub content: String,
    /// Tool call records; non-empty only for `Role::Tool`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_invocations: Vec<ToolInvocation>,
    /// Creation time in Unix milliseconds, immutable
    pub timestamp: i64,
    /// True only while content is being incrementally replaced
    #[serde(default)]
    pub is_streaming: bool,
    /// Set at most once, never cleared
    #[serde(default)]
    pub is_cancelled: bool,
}

/// A message minus its store-assigned `id` and `timestamp`.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub role: Role,
    pub content: String,
    pub tool_invocations: Vec<ToolInvocation>,
}

impl MessageDraft {
    /// Draft a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_invocations: vec![],
        }
    }

    /// Draft an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_invocations: vec![],
        }
    }

    /// Draft a tool message carrying invocation records
    pub fn tool(content: impl Into<String>, tool_invocations: Vec<ToolInvocation>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_invocations,
        }
    }

    /// Attach the store-assigned identity, producing the stored message
    pub fn assign(self, id: MessageId, timestamp: i64) -> Message {
        Message {
            id,
            role: self.role,
            content: self.content,
            tool_invocations: self.tool_invocations,
            timestamp,
            is_streaming: false,
            is_cancelled: false,
        }
    }
}

/// Session status tracked alongside the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Idle,
    Loading,
    Streaming,
    Error,
}

impl ChatStatus {
    /// Whether a request is outstanding in this status
    pub fn is_busy(&self) -> bool {
        matches!(self, ChatStatus::Loading | ChatStatus::Streaming)
    }
}
