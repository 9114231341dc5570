//! Channel correlator — the stateful request-channel backend
//!
//! Consumes the caller's inbound message stream and derives the outbound
//! count stream from it. Every inbound message bumps a shared counter and
//! starts a fresh derived producer carrying the new count; the previous
//! producer is switched out, not merged. Only the latest generation emits.

use crate::error::HandlerError;
use crate::handler::{ChannelHandler, CountStream};
use crate::message::Message;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Correlates an inbound message stream with a derived count stream
///
/// Per invocation, a counter starts at 0 and is incremented once per
/// inbound message. Each message also starts a new derived producer that
/// emits the counter value as observed at the switch, once per tick,
/// forever — until the next message replaces it or the caller cancels.
///
/// The first emission of every generation comes one full tick after its
/// message arrived, so a quick succession of inbound messages can retire
/// a generation before it ever emits.
///
/// Completion of the inbound stream does not complete the outbound one:
/// the last generation keeps ticking until the caller cancels. Callers
/// must cancel rather than drain to completion.
#[derive(Debug, Clone)]
pub struct ChannelCorrelator {
    /// Gap between consecutive emissions of a derived producer
    pub tick: Duration,
}

impl ChannelCorrelator {
    /// Create a correlator emitting once per `tick`
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }
}

impl Default for ChannelCorrelator {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl ChannelHandler for ChannelCorrelator {
    async fn open(
        &self,
        inbound: BoxStream<'static, Message>,
    ) -> std::result::Result<CountStream, HandlerError> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(consume(inbound, self.tick, tx));

        Ok(UnboundedReceiverStream::new(rx).map(Ok).boxed())
    }
}

/// Inbound consumer: one task per channel invocation
///
/// Owns the per-invocation counter and generation token. For each message
/// the counter increment happens here, on this task, before the producer
/// for the new generation is spawned — the producer only ever sees the
/// already-incremented value it was handed.
async fn consume(
    mut inbound: BoxStream<'static, Message>,
    tick: Duration,
    tx: mpsc::UnboundedSender<u64>,
) {
    let counter = AtomicU64::new(0);
    let generation = Arc::new(AtomicU64::new(0));

    loop {
        tokio::select! {
            () = tx.closed() => {
                tracing::debug!("Channel cancelled by caller");
                break;
            }
            message = inbound.next() => match message {
                Some(message) => {
                    let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    // Bumping the token is the switch point: the previous
                    // generation's next tick sees a stale token and exits.
                    let current = generation.fetch_add(1, Ordering::SeqCst) + 1;

                    tracing::debug!(
                        source = %message.source,
                        count,
                        generation = current,
                        "Channel message received, switching producer"
                    );

                    let start = Instant::now() + tick;
                    tokio::spawn(produce(
                        count,
                        current,
                        Arc::clone(&generation),
                        start,
                        tick,
                        tx.clone(),
                    ));
                }
                None => {
                    // Inbound completion does not end the outbound stream;
                    // the live producer keeps ticking until cancellation.
                    tracing::debug!("Channel inbound completed");
                    break;
                }
            }
        }
    }
}

/// Derived producer for one generation
///
/// Emits `count` once per tick, first emission at `start`. Before every
/// emission the generation token is checked; a superseded producer exits
/// silently, leaving any ticks it already emitted in place.
async fn produce(
    count: u64,
    current: u64,
    generation: Arc<AtomicU64>,
    start: Instant,
    tick: Duration,
    tx: mpsc::UnboundedSender<u64>,
) {
    let mut ticks = tokio::time::interval_at(start, tick);

    loop {
        tokio::select! {
            () = tx.closed() => break,
            _ = ticks.tick() => {
                if generation.load(Ordering::SeqCst) != current {
                    tracing::debug!(generation = current, "Producer superseded");
                    break;
                }
                if tx.send(count).is_err() {
                    break;
                }
            }
        }
    }
}
