//! Mock transport: canned responses with simulated delivery and cancellation

use std::ops::Range;
use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use parley_chat::{
    Delivery, Error, ResponseEvent, ResponseEventStream, ResponseTransport, Result, ToolInvocation,
};

use crate::responses::{CODE_GENERATOR, ResponseKind, code_generator_args, code_generator_result};

/// Default inter-chunk delay bounds for streaming delivery, in milliseconds.
/// Half-open: each delay is drawn uniformly from [20, 70).
const DEFAULT_CHUNK_DELAY_MS: Range<u64> = 20..70;

/// The shipped [`ResponseTransport`]: classifies the input by keyword and
/// replays a canned response, either atomically after a fixed delay or
/// word by word with randomized pauses.
#[derive(Debug, Clone)]
pub struct MockResponder {
    chunk_delay_ms: Range<u64>,
}

impl MockResponder {
    /// Create a responder with the default chunk delay bounds
    pub fn new() -> Self {
        Self {
            chunk_delay_ms: DEFAULT_CHUNK_DELAY_MS,
        }
    }

    /// Override the inter-chunk delay bounds (milliseconds, half-open).
    /// An empty range disables the delay entirely.
    pub fn with_chunk_delay(mut self, bounds: Range<u64>) -> Self {
        self.chunk_delay_ms = bounds;
        self
    }

    fn next_chunk_delay(bounds: &Range<u64>) -> Duration {
        if bounds.is_empty() {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(bounds.clone()))
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleep that aborts with [`Error::Cancelled`] when the token fires before
/// the delay elapses.
pub async fn sleep_cancellable(duration: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

#[async_trait]
impl ResponseTransport for MockResponder {
    async fn respond(
        &self,
        input: &str,
        delivery: Delivery,
        cancel: CancellationToken,
    ) -> Result<ResponseEventStream> {
        let kind = ResponseKind::classify(input);
        let text = kind.text().to_string();
        tracing::debug!(?kind, ?delivery, "mock responding");

        let stream: ResponseEventStream = match delivery {
            Delivery::Atomic => {
                let delay = kind.response_delay();
                Box::pin(stream! {
                    if let Err(error) = sleep_cancellable(delay, &cancel).await {
                        yield ResponseEvent::Failed { error };
                        return;
                    }
                    yield ResponseEvent::Done { text };
                })
            }
            Delivery::Streaming => {
                let bounds = self.chunk_delay_ms.clone();
                Box::pin(stream! {
                    // Split on single spaces so rejoining reproduces the
                    // text byte for byte (newlines stay inside tokens) and
                    // the final streamed prefix equals the atomic result.
                    let words: Vec<String> = text.split(' ').map(str::to_string).collect();
                    let mut prefix = String::new();

                    for (index, word) in words.iter().enumerate() {
                        // Checkpoint before each token
                        if cancel.is_cancelled() {
                            yield ResponseEvent::Failed { error: Error::Cancelled };
                            return;
                        }

                        if index > 0 {
                            prefix.push(' ');
                        }
                        prefix.push_str(word);
                        // Full accumulated prefix, not a delta
                        yield ResponseEvent::Chunk { text: prefix.clone() };

                        let pause = Self::next_chunk_delay(&bounds);
                        if let Err(error) = sleep_cancellable(pause, &cancel).await {
                            yield ResponseEvent::Failed { error };
                            return;
                        }
                    }

                    yield ResponseEvent::Done { text: prefix };
                })
            }
        };

        Ok(stream)
    }

    fn classify_tool_call(&self, input: &str) -> Option<ToolInvocation> {
        match ResponseKind::classify(input) {
            ResponseKind::Tool => Some(ToolInvocation::completed(
                CODE_GENERATOR,
                format!("call-{}", uuid::Uuid::new_v4()),
                code_generator_args(),
                code_generator_result(),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use parley_chat::ToolCallState;

    async fn collect(mut stream: ResponseEventStream) -> Vec<ResponseEvent> {
        let mut events = vec![];
        while let Some(event) = stream.next().await {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_atomic_delivery_returns_full_text_after_delay() {
        let responder = MockResponder::new();
        let started = tokio::time::Instant::now();

        let stream = responder
            .respond(
                "Show me markdown examples",
                Delivery::Atomic,
                CancellationToken::new(),
            )
            .await
            .unwrap();
        let events = collect(stream).await;

        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(events.len(), 1);
        match &events[0] {
            ResponseEvent::Done { text } => {
                assert_eq!(*text, ResponseKind::Markdown.text());
            }
            other => panic!("expected Done, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_atomic_delay_varies_by_kind() {
        let responder = MockResponder::new();

        let started = tokio::time::Instant::now();
        let stream = responder
            .respond("give me a long answer", Delivery::Atomic, CancellationToken::new())
            .await
            .unwrap();
        collect(stream).await;
        assert!(started.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_streaming_chunks_are_prefix_extensions() {
        let responder = MockResponder::new();
        let input = "this will fail"; // error variant: short, fixed text

        let stream = responder
            .respond(input, Delivery::Streaming, CancellationToken::new())
            .await
            .unwrap();
        let events = collect(stream).await;

        let expected = ResponseKind::Error.text();
        let word_count = expected.split(' ').count();

        let chunks: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                ResponseEvent::Chunk { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(chunks.len(), word_count);

        for window in chunks.windows(2) {
            assert!(window[1].len() > window[0].len());
            assert!(window[1].starts_with(window[0]));
        }

        // The final event is Done with the same text as atomic delivery
        match events.last().unwrap() {
            ResponseEvent::Done { text } => {
                assert_eq!(text, chunks.last().unwrap());
                assert_eq!(*text, expected);
            }
            other => panic!("expected Done, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_streamed_text_matches_atomic_for_multiline_content() {
        // Markdown demo spans many lines; streaming must still reproduce it
        let responder = MockResponder::new();

        let stream = responder
            .respond("markdown please", Delivery::Streaming, CancellationToken::new())
            .await
            .unwrap();
        let events = collect(stream).await;

        match events.last().unwrap() {
            ResponseEvent::Done { text } => assert_eq!(*text, ResponseKind::Markdown.text()),
            other => panic!("expected Done, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_precancelled_streaming_yields_no_chunks() {
        let responder = MockResponder::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let stream = responder
            .respond("hello", Delivery::Streaming, cancel)
            .await
            .unwrap();
        let events = collect(stream).await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            ResponseEvent::Failed { error } => assert!(error.is_cancelled()),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_precancelled_atomic_fails_immediately() {
        let responder = MockResponder::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let stream = responder
            .respond("hello", Delivery::Atomic, cancel)
            .await
            .unwrap();
        let events = collect(stream).await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            ResponseEvent::Failed { error } => assert!(error.is_cancelled()),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_between_chunks_stops_stream() {
        let responder = MockResponder::new();
        let cancel = CancellationToken::new();

        let mut stream = responder
            .respond("hello", Delivery::Streaming, cancel.clone())
            .await
            .unwrap();

        // First chunk arrives, then the token fires mid-delay
        match stream.next().await.unwrap() {
            ResponseEvent::Chunk { .. } => {}
            other => panic!("expected Chunk, got {:?}", other),
        }
        cancel.cancel();

        match stream.next().await.unwrap() {
            ResponseEvent::Failed { error } => assert!(error.is_cancelled()),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_cancellable_completes_without_cancel() {
        let cancel = CancellationToken::new();
        assert!(sleep_cancellable(Duration::from_millis(50), &cancel).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_cancellable_aborts_mid_delay() {
        let cancel = CancellationToken::new();
        let fire = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            fire.cancel();
        });

        let result = sleep_cancellable(Duration::from_secs(60), &cancel).await;
        assert_eq!(result, Err(Error::Cancelled));
    }

    #[test]
    fn test_classify_tool_call_for_tool_inputs() {
        let responder = MockResponder::new();

        let invocation = responder.classify_tool_call("Generate some code").unwrap();
        assert_eq!(invocation.tool_name, "code_generator");
        assert_eq!(invocation.state, ToolCallState::Result);
        assert!(invocation.result.is_some());
        assert!(invocation.tool_call_id.starts_with("call-"));

        assert!(responder.classify_tool_call("Show me markdown").is_none());
        assert!(responder.classify_tool_call("hello").is_none());
    }

    #[test]
    fn test_tool_call_ids_are_unique() {
        let responder = MockResponder::new();
        let a = responder.classify_tool_call("run a tool").unwrap();
        let b = responder.classify_tool_call("run a tool").unwrap();
        assert_ne!(a.tool_call_id, b.tool_call_id);
    }

    #[tokio::test]
    async fn test_zero_delay_bounds_stream_instantly() {
        let responder = MockResponder::new().with_chunk_delay(0..0);
        let stream = responder
            .respond("this will fail", Delivery::Streaming, CancellationToken::new())
            .await
            .unwrap();
        let events = collect(stream).await;
        assert!(matches!(events.last().unwrap(), ResponseEvent::Done { .. }));
    }
}
