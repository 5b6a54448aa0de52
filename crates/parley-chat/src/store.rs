//! Conversation state: ordered messages and session status.
//!
//! The store exclusively owns the message list; everything else mutates it
//! through the operations here. It is a plain data structure with no
//! knowledge of transports or rendering, so it is testable in isolation.

use crate::ids::{IdGenerator, UuidIds};
use crate::types::{ChatStatus, Message, MessageDraft, MessageId, Role};

/// Ordered message list plus session status.
pub struct ConversationStore {
    messages: Vec<Message>,
    status: ChatStatus,
    ids: Box<dyn IdGenerator>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Create an empty store with the default uuid id generator
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIds))
    }

    /// Create an empty store with an injected id generator
    pub fn with_ids(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            messages: Vec::new(),
            status: ChatStatus::Idle,
            ids,
        }
    }

    /// Seed the store with existing messages
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Assign id and timestamp to the draft, append it, and return the
    /// stored message.
    pub fn append(&mut self, draft: MessageDraft) -> Message {
        let message = draft.assign(self.ids.next_id(), chrono::Utc::now().timestamp_millis());
        self.messages.push(message.clone());
        message
    }

    /// Apply a transformation to the message matching `id`.
    ///
    /// Returns `false` (and does nothing) if no message matches.
    pub fn patch_by_id(&mut self, id: &MessageId, patch: impl FnOnce(&mut Message)) -> bool {
        match self.messages.iter_mut().find(|m| &m.id == id) {
            Some(message) => {
                patch(message);
                true
            }
            None => false,
        }
    }

    /// Advance the invocation matching `tool_call_id` to `Result` with the
    /// given payload. Returns `false` if no invocation matches or it already
    /// holds a result.
    pub fn attach_tool_result(&mut self, tool_call_id: &str, result: serde_json::Value) -> bool {
        for message in &mut self.messages {
            if let Some(invocation) = message
                .tool_invocations
                .iter_mut()
                .find(|inv| inv.tool_call_id == tool_call_id)
            {
                return invocation.complete(result);
            }
        }
        false
    }

    /// Flag the last assistant message as cancelled and stop all streaming.
    ///
    /// Clearing `is_streaming` on every message is defensive cleanup in case
    /// more than one was mid-stream.
    pub fn mark_last_assistant_cancelled(&mut self) {
        let last_assistant = self
            .messages
            .iter()
            .rposition(|m| m.role == Role::Assistant);
        for (index, message) in self.messages.iter_mut().enumerate() {
            message.is_streaming = false;
            if Some(index) == last_assistant {
                message.is_cancelled = true;
            }
        }
    }

    /// Remove the last assistant message and everything after it.
    ///
    /// Returns `false` if the list holds no assistant message.
    pub fn truncate_from_last_assistant(&mut self) -> bool {
        match self
            .messages
            .iter()
            .rposition(|m| m.role == Role::Assistant)
        {
            Some(index) => {
                self.messages.truncate(index);
                true
            }
            None => false,
        }
    }

    /// Remove and return the most recent message
    pub fn pop_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    /// Clear the list and return the status to idle
    pub fn reset(&mut self) {
        self.messages.clear();
        self.status = ChatStatus::Idle;
    }

    /// Set the session status
    pub fn set_status(&mut self, status: ChatStatus) {
        self.status = status;
    }

    /// Get the session status
    pub fn status(&self) -> ChatStatus {
        self.status
    }

    /// Get all messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Look up a message by id
    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequenceIds;
    use crate::types::{ToolCallState, ToolInvocation};

    fn test_store() -> ConversationStore {
        ConversationStore::with_ids(Box::new(SequenceIds::new()))
    }

    #[test]
    fn test_append_assigns_id_and_timestamp() {
        let mut store = test_store();
        let msg = store.append(MessageDraft::user("hi"));
        assert_eq!(msg.id.as_str(), "msg-0");
        assert!(msg.timestamp > 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].content, "hi");
    }

    #[test]
    fn test_patch_round_trip_preserves_identity() {
        let mut store = test_store();
        let msg = store.append(MessageDraft::user("hi"));
        let original_timestamp = msg.timestamp;

        assert!(store.patch_by_id(&msg.id, |m| m.content = "bye".to_string()));

        let patched = store.get(&msg.id).unwrap();
        assert_eq!(patched.content, "bye");
        assert_eq!(patched.id, msg.id);
        assert_eq!(patched.timestamp, original_timestamp);
    }

    #[test]
    fn test_patch_missing_id_is_noop() {
        let mut store = test_store();
        store.append(MessageDraft::user("hi"));
        let absent = MessageId::new("msg-999");
        assert!(!store.patch_by_id(&absent, |m| m.content = "changed".to_string()));
        assert_eq!(store.messages()[0].content, "hi");
    }

    #[test]
    fn test_mark_last_assistant_cancelled() {
        let mut store = test_store();
        store.append(MessageDraft::user("q1"));
        let a1 = store.append(MessageDraft::assistant("r1"));
        store.append(MessageDraft::user("q2"));
        let a2 = store.append(MessageDraft::assistant("r2"));

        // Simulate both assistants left mid-stream
        store.patch_by_id(&a1.id, |m| m.is_streaming = true);
        store.patch_by_id(&a2.id, |m| m.is_streaming = true);

        store.mark_last_assistant_cancelled();

        let first = store.get(&a1.id).unwrap();
        assert!(!first.is_cancelled);
        assert!(!first.is_streaming);

        let last = store.get(&a2.id).unwrap();
        assert!(last.is_cancelled);
        assert!(!last.is_streaming);
    }

    #[test]
    fn test_mark_cancelled_empty_store() {
        let mut store = test_store();
        store.mark_last_assistant_cancelled();
        assert!(store.is_empty());
    }

    #[test]
    fn test_attach_tool_result_advances_state() {
        let mut store = test_store();
        let inv = ToolInvocation::call("code_generator", "call_7", serde_json::json!({}));
        store.append(MessageDraft::tool("", vec![inv]));

        assert!(store.attach_tool_result("call_7", serde_json::json!({"code": "pass"})));

        let stored = &store.messages()[0].tool_invocations[0];
        assert_eq!(stored.state, ToolCallState::Result);
        assert!(stored.result.is_some());

        // Never regresses: a second attach is rejected
        assert!(!store.attach_tool_result("call_7", serde_json::json!({"code": "other"})));
    }

    #[test]
    fn test_attach_tool_result_unknown_id() {
        let mut store = test_store();
        store.append(MessageDraft::user("hi"));
        assert!(!store.attach_tool_result("call_404", serde_json::json!({})));
    }

    #[test]
    fn test_truncate_from_last_assistant() {
        let mut store = test_store();
        store.append(MessageDraft::user("q1"));
        store.append(MessageDraft::assistant("r1"));
        store.append(MessageDraft::user("q2"));
        store.append(MessageDraft::assistant("r2"));
        store.append(MessageDraft::tool("", vec![]));

        assert!(store.truncate_from_last_assistant());

        // r2 and the trailing tool message are gone
        assert_eq!(store.len(), 3);
        assert_eq!(store.messages()[2].content, "q2");

        let mut empty = test_store();
        empty.append(MessageDraft::user("only"));
        assert!(!empty.truncate_from_last_assistant());
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn test_reset_clears_list_and_status() {
        let mut store = test_store();
        store.append(MessageDraft::user("hi"));
        store.set_status(ChatStatus::Streaming);

        store.reset();

        assert!(store.is_empty());
        assert_eq!(store.status(), ChatStatus::Idle);
    }

    #[test]
    fn test_with_messages_seeds_list() {
        let seed = MessageDraft::user("seeded").assign(MessageId::new("msg-s"), 42);
        let store = test_store().with_messages(vec![seed]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].content, "seeded");
    }
}
