//! Transport abstraction for producing assistant responses

use std::pin::Pin;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::ToolInvocation;

/// How a response should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// Single delivery of the full text after the response settles
    Atomic,
    /// Incremental word-by-word delivery
    Streaming,
}

/// Events yielded while a response is produced.
///
/// `Chunk` carries the full accumulated text so far, not a delta; consumers
/// replace prior content on every chunk. A well-formed stream yields zero or
/// more chunks followed by exactly one `Done` or `Failed`.
#[derive(Debug, Clone)]
pub enum ResponseEvent {
    /// Full accumulated text so far
    Chunk { text: String },
    /// Response completed with its final text
    Done { text: String },
    /// Response failed
    Failed { error: Error },
}

impl ResponseEvent {
    /// Check if this is a terminal event
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResponseEvent::Done { .. } | ResponseEvent::Failed { .. })
    }
}

/// A stream of response events
pub type ResponseEventStream = Pin<Box<dyn Stream<Item = ResponseEvent> + Send>>;

/// Producer of assistant output for a given user input.
#[async_trait]
pub trait ResponseTransport: Send + Sync {
    /// Produce a response for `input`, honoring the cancellation token.
    ///
    /// Cancellation is cooperative: implementations check the token at their
    /// suspend points and fail the stream with [`Error::Cancelled`].
    async fn respond(
        &self,
        input: &str,
        delivery: Delivery,
        cancel: CancellationToken,
    ) -> Result<ResponseEventStream>;

    /// Structured lookup of the simulated tool call triggered by `input`,
    /// if any. Synchronous so callers can render the tool-call lifecycle
    /// independently of the narrative text response.
    fn classify_tool_call(&self, input: &str) -> Option<ToolInvocation> {
        let _ = input;
        None
    }
}
