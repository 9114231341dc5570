//! Handler traits — one per interaction pattern
//!
//! A handler is registered on a [`Router`](crate::Router) under a route
//! name and invoked by the engine when a caller executes that route. The
//! trait fixes the cardinality: one response, none, a stream, or a stream
//! derived from an inbound stream. Reference handlers implementing the
//! stock behaviors live here as well.

use crate::error::HandlerError;
use crate::message::Message;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;

/// Stream of messages produced by a [`StreamHandler`]
pub type MessageStream = BoxStream<'static, std::result::Result<Message, HandlerError>>;

/// Stream of counter values produced by a [`ChannelHandler`]
pub type CountStream = BoxStream<'static, std::result::Result<u64, HandlerError>>;

/// Handler for request-response interactions
///
/// Invoked exactly once per request; returns exactly one message or fails.
#[async_trait]
pub trait RequestResponseHandler: Send + Sync {
    /// Produce the single response to `request`
    async fn handle(&self, request: Message) -> std::result::Result<Message, HandlerError>;
}

/// Handler for fire-and-forget interactions
///
/// Invoked exactly once per request. The return value is observed only on
/// the receiving side — a failure here never reaches the caller.
#[async_trait]
pub trait FireAndForgetHandler: Send + Sync {
    /// Consume `request` without producing a response
    async fn handle(&self, request: Message) -> std::result::Result<(), HandlerError>;
}

/// Handler for request-stream interactions
///
/// Invoked once per request; returns a lazy, typically unbounded sequence
/// of messages. Production stops when the caller cancels.
#[async_trait]
pub trait StreamHandler: Send + Sync {
    /// Open the response stream for `request`
    async fn handle(&self, request: Message) -> std::result::Result<MessageStream, HandlerError>;
}

/// Handler for request-channel interactions
///
/// Receives the caller's inbound message stream and returns the derived
/// outbound count stream.
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    /// Open the channel over `inbound`
    async fn open(
        &self,
        inbound: BoxStream<'static, Message>,
    ) -> std::result::Result<CountStream, HandlerError>;
}

/// Replies to each request with [`Message::reply`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl RequestResponseHandler for EchoHandler {
    async fn handle(&self, request: Message) -> std::result::Result<Message, HandlerError> {
        Ok(request.reply())
    }
}

/// Records each request in the log and discards it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl FireAndForgetHandler for LogSink {
    async fn handle(&self, request: Message) -> std::result::Result<(), HandlerError> {
        tracing::info!(
            source = %request.source,
            destination = %request.destination,
            text = %request.text,
            "Received fire-and-forget message"
        );
        Ok(())
    }
}

/// Emits the reply to the request once per interval, forever
///
/// The first reply arrives one full interval after the call; the stream
/// never completes on its own. Elapsed ticks are never dropped — a slow
/// consumer sees them queued, not skipped.
#[derive(Debug, Clone)]
pub struct EchoStreamHandler {
    /// Gap between consecutive replies
    pub interval: Duration,
}

impl EchoStreamHandler {
    /// Create a handler emitting once per `interval`
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for EchoStreamHandler {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

#[async_trait]
impl StreamHandler for EchoStreamHandler {
    async fn handle(&self, request: Message) -> std::result::Result<MessageStream, HandlerError> {
        let reply = request.reply();
        let start = tokio::time::Instant::now() + self.interval;
        let ticks = tokio::time::interval_at(start, self.interval);

        Ok(IntervalStream::new(ticks)
            .map(move |_| Ok(reply.clone()))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_handler_replies() {
        let reply = EchoHandler
            .handle(Message::new("client", "server", "ping"))
            .await
            .unwrap();

        assert_eq!(reply.source, "server");
        assert_eq!(reply.destination, "client");
        assert_eq!(reply.text, "In response to: ping");
    }

    #[tokio::test]
    async fn test_log_sink_accepts_anything() {
        LogSink.handle(Message::new("", "", "")).await.unwrap();
    }

    #[test]
    fn test_echo_stream_default_interval() {
        assert_eq!(EchoStreamHandler::default().interval, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_echo_stream_waits_one_interval_per_reply() {
        let handler = EchoStreamHandler::new(Duration::from_secs(3));
        let mut stream = handler
            .handle(Message::new("client", "server", "subscribe"))
            .await
            .unwrap();

        let start = tokio::time::Instant::now();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(first.source, "server");
        assert_eq!(first.destination, "client");
        assert_eq!(first.text, "In response to: subscribe");

        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(6));
        assert_eq!(second, first);
    }
}
