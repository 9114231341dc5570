//! Session — one logical connection, four entry points
//!
//! A session is created once per client and owns the route table for its
//! lifetime. All four interaction entry points delegate to the engine;
//! the session adds identity (a `sess-<uuid>` id), the configured
//! endpoint, and the establishment timestamp.

use crate::config::SessionConfig;
use crate::engine::InteractionEngine;
use crate::error::Result;
use crate::message::Message;
use crate::route::Router;
use crate::stream::InteractionStream;
use chrono::{DateTime, Utc};
use futures::Stream;
use uuid::Uuid;

/// One logical connection carrying independently-addressable routes
pub struct Session {
    id: String,
    config: SessionConfig,
    established_at: DateTime<Utc>,
    engine: InteractionEngine,
}

impl Session {
    /// Establish a session over a fully registered route table
    ///
    /// The router is frozen from here on: registrations happen at startup,
    /// never against a live session.
    pub fn connect(config: SessionConfig, router: Router) -> Self {
        let id = format!("sess-{}", Uuid::new_v4());

        tracing::info!(
            session = %id,
            endpoint = %config.endpoint(),
            routes = router.len(),
            "Session established"
        );

        Self {
            id,
            config,
            established_at: Utc::now(),
            engine: InteractionEngine::new(router),
        }
    }

    /// Session identifier (`sess-<uuid>`)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Connection parameters this session was established with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The configured endpoint as `host:port`
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// When the session was established
    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// The route table this session dispatches against
    pub fn router(&self) -> &Router {
        self.engine.router()
    }

    /// See [`InteractionEngine::request_response`]
    pub async fn request_response(&self, route: &str, request: Message) -> Result<Message> {
        self.engine.request_response(route, request).await
    }

    /// See [`InteractionEngine::fire_and_forget`]
    pub async fn fire_and_forget(&self, route: &str, request: Message) -> Result<()> {
        self.engine.fire_and_forget(route, request).await
    }

    /// See [`InteractionEngine::request_stream`]
    pub async fn request_stream(
        &self,
        route: &str,
        request: Message,
    ) -> Result<InteractionStream<Message>> {
        self.engine.request_stream(route, request).await
    }

    /// See [`InteractionEngine::request_channel`]
    pub async fn request_channel(
        &self,
        route: &str,
        inbound: impl Stream<Item = Message> + Send + 'static,
    ) -> Result<InteractionStream<u64>> {
        self.engine.request_channel(route, inbound).await
    }
}
