//! Session driver: submit/cancel/reset/reload over a conversation store.
//!
//! One request is in flight at a time. The session appends the user message
//! and a placeholder assistant message, drives the transport's response
//! stream into content patches on the placeholder, and settles the exchange
//! as completed, cancelled, or failed.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::events::ChatEvent;
use crate::store::ConversationStore;
use crate::transport::{Delivery, ResponseEvent, ResponseTransport};
use crate::types::{ChatStatus, Message, MessageDraft, MessageId, ToolInvocation};

/// Terminal content written to the placeholder when a request is cancelled.
pub const CANCELLED_CONTENT: &str = "Request was cancelled";

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How responses are delivered
    pub delivery: Delivery,
    /// Initial content of the pending assistant message
    pub placeholder_text: String,
    /// When false, a failed exchange discards the placeholder instead of
    /// leaving an `Error: ...` marker
    pub keep_last_message_on_error: bool,
    /// Minimum interval between streaming content patches; intermediate
    /// chunks are coalesced (the latest full prefix wins)
    pub throttle: Option<Duration>,
    /// Pause between observing a cancellation and returning to idle
    pub settle_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delivery: Delivery::Atomic,
            placeholder_text: "Processing your request...".to_string(),
            keep_last_message_on_error: true,
            throttle: None,
            settle_delay: Duration::from_millis(100),
        }
    }
}

/// A cloneable handle for poking the session from outside the task that
/// owns it. All fields are `Arc`-wrapped, so cloning is cheap.
#[derive(Clone)]
pub struct SessionHandle {
    /// Token for the request currently in flight; `None` once it settles
    cancel: Arc<Mutex<Option<CancellationToken>>>,
    is_running: Arc<AtomicBool>,
}

impl SessionHandle {
    fn new() -> Self {
        Self {
            cancel: Arc::new(Mutex::new(None)),
            is_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation of the in-flight request.
    ///
    /// Idempotent: firing an already-cancelled or already-released token has
    /// no observable effect.
    pub fn cancel(&self) {
        if let Some(token) = self.cancel.lock().as_ref() {
            token.cancel();
        }
    }

    /// Whether a request is currently in flight
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }

    /// Install a fresh token for a new request and return it
    fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.cancel.lock() = Some(token.clone());
        token
    }

    /// Release the token once the request settles
    fn release(&self) {
        *self.cancel.lock() = None;
    }
}

/// The chat session: owns the store and drives exchanges through a transport.
pub struct ChatSession {
    config: SessionConfig,
    store: ConversationStore,
    transport: Arc<dyn ResponseTransport>,
    event_tx: broadcast::Sender<ChatEvent>,
    handle: SessionHandle,
    /// Last submitted input, remembered for `reload`
    last_user_input: Option<String>,
    last_error: Option<Error>,
}

impl ChatSession {
    /// Create a session with an empty store
    pub fn new(config: SessionConfig, transport: Arc<dyn ResponseTransport>) -> Self {
        Self::with_store(config, transport, ConversationStore::new())
    }

    /// Create a session over an existing store (custom id generator or
    /// seeded messages)
    pub fn with_store(
        config: SessionConfig,
        transport: Arc<dyn ResponseTransport>,
        store: ConversationStore,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            config,
            store,
            transport,
            event_tx,
            handle: SessionHandle::new(),
            last_user_input: None,
            last_error: None,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    /// Get a cloneable handle for cancelling from outside
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    /// Current session status
    pub fn status(&self) -> ChatStatus {
        self.store.status()
    }

    /// Read access to the store
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// The error held since the last failed exchange, if any
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// The input `reload` would resubmit, if any
    pub fn last_input(&self) -> Option<&str> {
        self.last_user_input.as_deref()
    }

    /// Whether a request is currently in flight
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Current delivery mode
    pub fn delivery(&self) -> Delivery {
        self.config.delivery
    }

    /// Switch between atomic and streaming delivery
    pub fn set_delivery(&mut self, delivery: Delivery) {
        self.config.delivery = delivery;
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Submit user input and drive the exchange to a terminal state.
    ///
    /// Empty (whitespace-only) input is a no-op. Returns [`Error::Busy`]
    /// while a request is in flight: an unguarded resubmit would corrupt
    /// the placeholder bookkeeping.
    pub async fn submit(&mut self, input: &str) -> Result<()> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }
        if self.handle.is_running() {
            return Err(Error::Busy);
        }

        self.last_error = None;
        self.last_user_input = Some(input.to_string());
        self.run_exchange(input.to_string()).await
    }

    /// Retry the last exchange: discard the last assistant message (and
    /// anything after it) and resubmit the remembered input through the same
    /// path as a fresh submit. No-op if nothing was submitted yet.
    pub async fn reload(&mut self) -> Result<()> {
        let Some(input) = self.last_user_input.clone() else {
            return Ok(());
        };
        if self.handle.is_running() {
            return Err(Error::Busy);
        }

        self.store.truncate_from_last_assistant();
        self.last_error = None;
        self.run_exchange(input).await
    }

    /// Clear the conversation and return to idle, firing the token of any
    /// request still in flight.
    pub fn reset(&mut self) {
        self.handle.cancel();
        self.handle.release();
        self.store.reset();
        self.last_user_input = None;
        self.last_error = None;
        self.send(ChatEvent::SessionReset);
        self.send(ChatEvent::StatusChanged {
            status: ChatStatus::Idle,
        });
    }

    /// Cancel while no request is in flight: flag the last assistant message
    /// cancelled and settle back to idle. The mid-flight path is
    /// [`SessionHandle::cancel`], which the exchange loop observes itself.
    pub fn cancel_idle(&mut self) {
        if self.handle.is_running() {
            return;
        }
        self.store.mark_last_assistant_cancelled();
        self.set_status(ChatStatus::Idle);
        self.send(ChatEvent::Cancelled);
    }

    /// Run one submit-to-settle exchange.
    async fn run_exchange(&mut self, input: String) -> Result<()> {
        tracing::debug!(input = %input, delivery = ?self.config.delivery, "submitting");

        let user = self.store.append(MessageDraft::user(input.as_str()));
        self.send(ChatEvent::MessageAppended { message: user });

        // Structured tool call for this input, if any. The stored copy
        // starts at `Call`; the result payload is attached on completion.
        let pending_tool = self.transport.classify_tool_call(&input);
        if let Some(invocation) = &pending_tool {
            let tool_message = self
                .store
                .append(MessageDraft::tool(String::new(), vec![invocation.as_call()]));
            self.send(ChatEvent::MessageAppended {
                message: tool_message,
            });
        }

        let placeholder_text = self.config.placeholder_text.clone();
        let placeholder = self.store.append(MessageDraft::assistant(placeholder_text));
        let placeholder_id = placeholder.id.clone();
        self.send(ChatEvent::MessageAppended {
            message: placeholder,
        });

        let token = self.handle.arm();
        self.handle.is_running.store(true, Ordering::Release);
        self.set_status(ChatStatus::Loading);

        let outcome = self.drive_transport(&input, &placeholder_id, token).await;

        self.handle.release();
        self.handle.is_running.store(false, Ordering::Release);

        match outcome {
            Ok(final_text) => self.settle_completed(&placeholder_id, final_text, pending_tool),
            Err(Error::Cancelled) => self.settle_cancelled(&placeholder_id).await,
            Err(error) => self.settle_failed(&placeholder_id, error),
        }
    }

    /// Consume the response stream, patching the placeholder on each chunk.
    async fn drive_transport(
        &mut self,
        input: &str,
        placeholder_id: &MessageId,
        token: CancellationToken,
    ) -> Result<String> {
        let mut stream = self
            .transport
            .respond(input, self.config.delivery, token)
            .await?;

        let mut throttle = ChunkThrottle::new(self.config.throttle);
        let mut final_text = None;
        let mut failure = None;

        while let Some(event) = stream.next().await {
            match event {
                ResponseEvent::Chunk { text } => {
                    if throttle.admit() {
                        self.apply_chunk(placeholder_id, text);
                    }
                }
                ResponseEvent::Done { text } => {
                    final_text = Some(text);
                }
                ResponseEvent::Failed { error } => {
                    failure = Some(error);
                    break;
                }
            }
        }

        if let Some(error) = failure {
            return Err(error);
        }
        match final_text {
            Some(text) => Ok(text),
            None => {
                tracing::warn!("response stream ended without a terminal event");
                Err(Error::transport("response ended without a terminal event"))
            }
        }
    }

    /// Replace (never append) the placeholder content with the full prefix.
    fn apply_chunk(&mut self, placeholder_id: &MessageId, text: String) {
        if self.store.status() != ChatStatus::Streaming {
            self.set_status(ChatStatus::Streaming);
        }
        self.store.patch_by_id(placeholder_id, |message| {
            message.content = text;
            message.is_streaming = true;
        });
        if let Some(message) = self.store.get(placeholder_id) {
            self.send(ChatEvent::MessageUpdated {
                message: message.clone(),
            });
        }
    }

    fn settle_completed(
        &mut self,
        placeholder_id: &MessageId,
        final_text: String,
        pending_tool: Option<ToolInvocation>,
    ) -> Result<()> {
        self.store.patch_by_id(placeholder_id, |message| {
            message.content = final_text;
            message.is_streaming = false;
        });

        if let Some(invocation) = pending_tool {
            if let Some(result) = invocation.result {
                self.store.attach_tool_result(&invocation.tool_call_id, result);
                let updated = self
                    .store
                    .messages()
                    .iter()
                    .find(|m| {
                        m.tool_invocations
                            .iter()
                            .any(|inv| inv.tool_call_id == invocation.tool_call_id)
                    })
                    .cloned();
                if let Some(message) = updated {
                    self.send(ChatEvent::ToolCallUpdated { message });
                }
            }
        }

        self.set_status(ChatStatus::Idle);
        if let Some(message) = self.store.get(placeholder_id) {
            self.send(ChatEvent::MessageCompleted {
                message: message.clone(),
            });
        }
        Ok(())
    }

    async fn settle_cancelled(&mut self, placeholder_id: &MessageId) -> Result<()> {
        self.store.mark_last_assistant_cancelled();
        self.store.patch_by_id(placeholder_id, |message| {
            message.content = CANCELLED_CONTENT.to_string();
        });
        self.send(ChatEvent::Cancelled);

        // Brief hold so observers can show the cancelling state
        tokio::time::sleep(self.config.settle_delay).await;
        self.set_status(ChatStatus::Idle);
        Ok(())
    }

    fn settle_failed(&mut self, placeholder_id: &MessageId, error: Error) -> Result<()> {
        if self.config.keep_last_message_on_error {
            self.store.patch_by_id(placeholder_id, |message| {
                message.content = format!("Error: {error}");
                message.is_streaming = false;
            });
        } else {
            self.store.pop_last();
        }

        self.last_error = Some(error.clone());
        self.set_status(ChatStatus::Error);
        self.send(ChatEvent::Failed {
            message: error.to_string(),
        });
        Err(error)
    }

    fn set_status(&mut self, status: ChatStatus) {
        if self.store.status() == status {
            return;
        }
        self.store.set_status(status);
        self.send(ChatEvent::StatusChanged { status });
    }

    fn send(&self, event: ChatEvent) {
        let _ = self.event_tx.send(event);
    }
}

/// Rate limiter for streaming content patches.
///
/// Chunks carry the full accumulated text, so a skipped chunk is superseded
/// by the next admitted one; the terminal `Done` text always lands.
struct ChunkThrottle {
    interval: Option<Duration>,
    last: Option<tokio::time::Instant>,
}

impl ChunkThrottle {
    fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    fn admit(&mut self) -> bool {
        let Some(interval) = self.interval else {
            return true;
        };
        let now = tokio::time::Instant::now();
        match self.last {
            Some(previous) if now.duration_since(previous) < interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
