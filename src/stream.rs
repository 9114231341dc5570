//! Cancellable handle over an infinite producer
//!
//! Request-stream and request-channel results are unbounded sequences, so
//! they are delivered through an explicit producer handle rather than a
//! bare stream: a pump task forwards the handler's output into a queue the
//! caller drains, and a cancellation token gives the caller an explicit,
//! idempotent way to stop production.

use crate::error::{HandlerError, Result, SessionError};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Caller-side handle over one streaming interaction
///
/// Items arrive in production order. The producer keeps its own cadence:
/// ticks that elapse while the caller is not polling queue up and are
/// delivered as soon as demand returns — none are dropped.
///
/// Cancelling (or dropping) the handle stops the producer and releases its
/// timer. Items already queued at that point still drain; after them the
/// sequence ends with `Ok(None)`.
pub struct InteractionStream<T> {
    route: String,
    items: mpsc::UnboundedReceiver<Result<T>>,
    cancel: CancellationToken,
    pump: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> InteractionStream<T> {
    /// Spawn a pump task draining `source` into the handle's queue
    pub(crate) fn spawn(
        route: String,
        source: BoxStream<'static, std::result::Result<T, HandlerError>>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let pump = tokio::spawn(pump(route.clone(), source, tx, cancel.clone()));

        Self {
            route,
            items: rx,
            cancel,
            pump: Some(pump),
        }
    }

    /// Receive the next item
    ///
    /// Returns `Ok(Some(item))` for each produced value, `Ok(None)` once
    /// the sequence has ended (handler completion or cancellation), or an
    /// error if the handler failed mid-sequence or the producer task died.
    /// After a terminal error the sequence ends with `Ok(None)`.
    pub async fn next(&mut self) -> Result<Option<T>> {
        match self.items.recv().await {
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(error)) => Err(error),
            None => {
                // Queue closed: the pump exited. A clean exit is the end
                // of the sequence; a panic is reported exactly once.
                if let Some(pump) = self.pump.take() {
                    if let Err(join) = pump.await {
                        if join.is_panic() {
                            return Err(SessionError::Producer {
                                route: self.route.clone(),
                                reason: join.to_string(),
                            });
                        }
                    }
                }
                Ok(None)
            }
        }
    }

    /// Stop the producer
    ///
    /// Idempotent: cancelling an already-cancelled handle is a no-op.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the handle has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Route this interaction was dispatched on
    pub fn route(&self) -> &str {
        &self.route
    }
}

// Manual impl: the handle is Debug for any item type, debuggable or not
impl<T> fmt::Debug for InteractionStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionStream")
            .field("route", &self.route)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl<T> Drop for InteractionStream<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Forward handler output into the queue until cancellation or completion
///
/// A handler error is forwarded as the terminal item and ends the pump;
/// items the caller has not yet drained stay in the queue.
async fn pump<T>(
    route: String,
    mut source: BoxStream<'static, std::result::Result<T, HandlerError>>,
    tx: mpsc::UnboundedSender<Result<T>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!(route = %route, "Producer cancelled");
                break;
            }
            item = source.next() => match item {
                Some(Ok(item)) => {
                    if tx.send(Ok(item)).is_err() {
                        break;
                    }
                }
                Some(Err(error)) => {
                    tracing::warn!(route = %route, error = %error, "Producer ended with handler error");
                    let _ = tx.send(Err(SessionError::Interaction {
                        route,
                        source: error,
                    }));
                    break;
                }
                None => {
                    tracing::debug!(route = %route, "Producer completed");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_stream::wrappers::IntervalStream;
    use tokio_test::{assert_pending, assert_ready, task};

    fn from_items(items: Vec<std::result::Result<u64, HandlerError>>) -> InteractionStream<u64> {
        InteractionStream::spawn("updates".to_string(), futures::stream::iter(items).boxed())
    }

    #[tokio::test]
    async fn test_forwards_items_in_order() {
        let mut handle = from_items(vec![Ok(1), Ok(2), Ok(3)]);

        assert_eq!(handle.next().await.unwrap(), Some(1));
        assert_eq!(handle.next().await.unwrap(), Some(2));
        assert_eq!(handle.next().await.unwrap(), Some(3));
        assert_eq!(handle.next().await.unwrap(), None);
        // the end is stable
        assert_eq!(handle.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_handler_error_is_terminal() {
        let mut handle = from_items(vec![Ok(7), Err("tick source failed".into())]);

        assert_eq!(handle.next().await.unwrap(), Some(7));

        let err = handle.next().await.unwrap_err();
        match err {
            SessionError::Interaction { route, source } => {
                assert_eq!(route, "updates");
                assert_eq!(source.to_string(), "tick source failed");
            }
            other => panic!("expected Interaction, got {other:?}"),
        }

        assert_eq!(handle.next().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drains_queued_items_then_ends() {
        let items: Vec<std::result::Result<u64, HandlerError>> = vec![Ok(1), Ok(2), Ok(3)];
        let source = futures::stream::iter(items)
            .chain(futures::stream::pending())
            .boxed();
        let mut handle = InteractionStream::spawn("updates".to_string(), source);

        // let the pump forward everything that is ready
        tokio::task::yield_now().await;
        handle.cancel();
        assert!(handle.is_cancelled());

        assert_eq!(handle.next().await.unwrap(), Some(1));
        assert_eq!(handle.next().await.unwrap(), Some(2));
        assert_eq!(handle.next().await.unwrap(), Some(3));
        assert_eq!(handle.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_debug_works_for_non_debug_items() {
        // Message-or-not, the handle itself must be debuggable so callers
        // can unwrap_err() results carrying it
        struct Opaque;
        let source = futures::stream::pending::<std::result::Result<Opaque, HandlerError>>().boxed();
        let handle = InteractionStream::spawn("updates".to_string(), source);

        assert_eq!(
            format!("{handle:?}"),
            r#"InteractionStream { route: "updates", cancelled: false }"#
        );

        handle.cancel();
        assert!(format!("{handle:?}").contains("cancelled: true"));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let source = futures::stream::pending::<std::result::Result<u64, HandlerError>>().boxed();
        let mut handle = InteractionStream::spawn("updates".to_string(), source);

        handle.cancel();
        handle.cancel();

        assert!(handle.is_cancelled());
        assert_eq!(handle.next().await.unwrap(), None);
        assert_eq!(handle.next().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_the_pump() {
        struct Guard(Arc<AtomicBool>);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let released = Arc::new(AtomicBool::new(false));
        let guard = Guard(released.clone());
        let source = futures::stream::pending::<std::result::Result<u64, HandlerError>>()
            .map(move |item| {
                let _guard = &guard;
                item
            })
            .boxed();

        let handle = InteractionStream::spawn("updates".to_string(), source);
        drop(handle);

        for _ in 0..50 {
            if released.load(Ordering::SeqCst) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_pump_panic_surfaces_as_producer_error() {
        let source = futures::stream::poll_fn(
            |_| -> std::task::Poll<Option<std::result::Result<u64, HandlerError>>> {
                panic!("tick source failed")
            },
        )
        .boxed();
        let mut handle = InteractionStream::spawn("updates".to_string(), source);

        let err = handle.next().await.unwrap_err();
        match err {
            SessionError::Producer { route, .. } => assert_eq!(route, "updates"),
            other => panic!("expected Producer, got {other:?}"),
        }

        // reported once, then the sequence is over
        assert_eq!(handle.next().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_is_lazy_until_the_source_yields() {
        let reply = Message::new("Server", "Client", "tick");
        let start = tokio::time::Instant::now() + Duration::from_secs(1);
        let source = IntervalStream::new(tokio::time::interval_at(start, Duration::from_secs(1)))
            .map(move |_| Ok(reply.clone()))
            .boxed();
        let mut handle = InteractionStream::spawn("updates".to_string(), source);

        let mut next = task::spawn(handle.next());
        assert_pending!(next.poll());

        tokio::time::advance(Duration::from_secs(1)).await;
        // the pump task needs a turn to forward the tick before the
        // caller's waker fires
        tokio::task::yield_now().await;
        assert!(next.is_woken());

        let first = assert_ready!(next.poll()).unwrap().unwrap();
        assert_eq!(first.text, "tick");
        drop(next);

        assert_eq!(handle.route(), "updates");
    }
}
