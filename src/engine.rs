//! Interaction engine — executes the four patterns against a route table
//!
//! The engine owns the frozen [`Router`] and enforces each pattern's
//! request/response cardinality: exactly one response, none, a stream of
//! responses, or a stream derived from a stream of requests. Concurrently
//! active interactions are independent; a failure in one never affects
//! another.

use crate::error::{Result, SessionError};
use crate::message::Message;
use crate::route::Router;
use crate::stream::InteractionStream;
use futures::{Stream, StreamExt};

/// Executes interactions against a route table
///
/// Streaming patterns each run as their own cancellable task; see
/// [`InteractionStream`]. Embedders that do not need session identity can
/// use the engine directly.
pub struct InteractionEngine {
    router: Router,
}

impl InteractionEngine {
    /// Create an engine over a fully registered route table
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// The route table this engine dispatches against
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// One request in, one response out
    ///
    /// Invokes the handler exactly once and awaits its single response.
    /// A handler failure reaches the caller as
    /// [`SessionError::Interaction`]; no partial response is ever emitted.
    pub async fn request_response(&self, route: &str, request: Message) -> Result<Message> {
        let handler = self.router.request_response(route)?;
        tracing::debug!(route = %route, "Dispatching request-response");

        handler
            .handle(request)
            .await
            .map_err(|source| SessionError::Interaction {
                route: route.to_string(),
                source,
            })
    }

    /// One request in, nothing out
    ///
    /// `Ok(())` means accepted for processing, nothing more. The handler
    /// runs on a detached task; if it fails, the failure is logged on the
    /// receiving side and never reaches the caller — the pattern has no
    /// response channel to carry it.
    pub async fn fire_and_forget(&self, route: &str, request: Message) -> Result<()> {
        let handler = self.router.fire_and_forget(route)?;
        tracing::debug!(route = %route, "Dispatching fire-and-forget");

        let route = route.to_string();
        tokio::spawn(async move {
            if let Err(error) = handler.handle(request).await {
                tracing::warn!(route = %route, error = %error, "Fire-and-forget handler failed");
            }
        });

        Ok(())
    }

    /// One request in, an unbounded stream of responses out
    ///
    /// Production continues until the caller cancels the returned handle.
    /// The producer keeps its own cadence; ticks a slow caller has not yet
    /// drained queue up rather than being dropped.
    pub async fn request_stream(
        &self,
        route: &str,
        request: Message,
    ) -> Result<InteractionStream<Message>> {
        let handler = self.router.request_stream(route)?;
        tracing::debug!(route = %route, "Dispatching request-stream");

        let outbound = handler
            .handle(request)
            .await
            .map_err(|source| SessionError::Interaction {
                route: route.to_string(),
                source,
            })?;

        Ok(InteractionStream::spawn(route.to_string(), outbound))
    }

    /// A stream of requests in, a derived stream of counts out
    ///
    /// The handler correlates the inbound stream with the outbound one;
    /// see [`ChannelCorrelator`](crate::ChannelCorrelator) for the
    /// reference switch semantics. The outbound stream runs until the
    /// caller cancels — inbound completion alone does not end it.
    pub async fn request_channel(
        &self,
        route: &str,
        inbound: impl Stream<Item = Message> + Send + 'static,
    ) -> Result<InteractionStream<u64>> {
        let handler = self.router.request_channel(route)?;
        tracing::debug!(route = %route, "Dispatching request-channel");

        let outbound = handler
            .open(inbound.boxed())
            .await
            .map_err(|source| SessionError::Interaction {
                route: route.to_string(),
                source,
            })?;

        Ok(InteractionStream::spawn(route.to_string(), outbound))
    }
}
