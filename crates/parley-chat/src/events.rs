//! Session event types

use serde::{Deserialize, Serialize};

use crate::types::{ChatStatus, Message};

/// Events emitted while a session processes requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Session status changed
    StatusChanged { status: ChatStatus },

    /// A message was appended to the conversation
    MessageAppended { message: Message },

    /// Streaming content update for a message
    MessageUpdated { message: Message },

    /// A message reached its terminal content
    MessageCompleted { message: Message },

    /// A tool invocation advanced state
    ToolCallUpdated { message: Message },

    /// The in-flight request was cancelled
    Cancelled,

    /// The in-flight request failed
    Failed { message: String },

    /// The conversation was cleared
    SessionReset,
}

impl ChatEvent {
    /// Check if this event settles the outstanding request
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChatEvent::MessageCompleted { .. } | ChatEvent::Cancelled | ChatEvent::Failed { .. }
        )
    }
}
