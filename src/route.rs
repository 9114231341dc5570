//! Route table mapping route names to handlers
//!
//! Each route serves exactly one interaction pattern. The table is built
//! once at startup and frozen when the session takes ownership — there is
//! no ambient global registry.

use crate::error::{Result, SessionError};
use crate::handler::{
    ChannelHandler, FireAndForgetHandler, RequestResponseHandler, StreamHandler,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The four interaction patterns a route can serve
///
/// The pattern fixes the request/response cardinality of every call on
/// the route: how many messages flow, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionPattern {
    /// One request, one response
    RequestResponse,
    /// One request, no response
    FireAndForget,
    /// One request, an unbounded stream of responses
    RequestStream,
    /// A stream of requests, a derived stream of responses
    RequestChannel,
}

impl fmt::Display for InteractionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RequestResponse => "request-response",
            Self::FireAndForget => "fire-and-forget",
            Self::RequestStream => "request-stream",
            Self::RequestChannel => "request-channel",
        };
        f.write_str(name)
    }
}

enum RouteEntry {
    RequestResponse(Arc<dyn RequestResponseHandler>),
    FireAndForget(Arc<dyn FireAndForgetHandler>),
    RequestStream(Arc<dyn StreamHandler>),
    RequestChannel(Arc<dyn ChannelHandler>),
}

impl RouteEntry {
    fn pattern(&self) -> InteractionPattern {
        match self {
            Self::RequestResponse(_) => InteractionPattern::RequestResponse,
            Self::FireAndForget(_) => InteractionPattern::FireAndForget,
            Self::RequestStream(_) => InteractionPattern::RequestStream,
            Self::RequestChannel(_) => InteractionPattern::RequestChannel,
        }
    }
}

/// Route table consulted on every dispatch
///
/// Register handlers at startup, then hand the router to
/// [`Session::connect`](crate::Session::connect). Registration is typed
/// per pattern so a route's handler always agrees with its cardinality.
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, RouteEntry>,
}

impl Router {
    /// Create an empty route table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request-response handler under `route`
    pub fn register_request_response(
        &mut self,
        route: impl Into<String>,
        handler: impl RequestResponseHandler + 'static,
    ) -> Result<()> {
        self.insert(route.into(), RouteEntry::RequestResponse(Arc::new(handler)))
    }

    /// Register a fire-and-forget handler under `route`
    pub fn register_fire_and_forget(
        &mut self,
        route: impl Into<String>,
        handler: impl FireAndForgetHandler + 'static,
    ) -> Result<()> {
        self.insert(route.into(), RouteEntry::FireAndForget(Arc::new(handler)))
    }

    /// Register a request-stream handler under `route`
    pub fn register_request_stream(
        &mut self,
        route: impl Into<String>,
        handler: impl StreamHandler + 'static,
    ) -> Result<()> {
        self.insert(route.into(), RouteEntry::RequestStream(Arc::new(handler)))
    }

    /// Register a request-channel handler under `route`
    pub fn register_request_channel(
        &mut self,
        route: impl Into<String>,
        handler: impl ChannelHandler + 'static,
    ) -> Result<()> {
        self.insert(route.into(), RouteEntry::RequestChannel(Arc::new(handler)))
    }

    fn insert(&mut self, route: String, entry: RouteEntry) -> Result<()> {
        if let Some(existing) = self.routes.get(&route) {
            return Err(SessionError::DuplicateRoute {
                route,
                pattern: existing.pattern(),
            });
        }

        let pattern = entry.pattern();
        self.routes.insert(route.clone(), entry);
        tracing::info!(route = %route, pattern = %pattern, "Route registered");

        Ok(())
    }

    /// Pattern served by `route`, if registered
    pub fn pattern_of(&self, route: &str) -> Option<InteractionPattern> {
        self.routes.get(route).map(RouteEntry::pattern)
    }

    /// All registered routes with their patterns, sorted by route name
    pub fn routes(&self) -> Vec<(String, InteractionPattern)> {
        let mut routes: Vec<_> = self
            .routes
            .iter()
            .map(|(route, entry)| (route.clone(), entry.pattern()))
            .collect();
        routes.sort_by(|a, b| a.0.cmp(&b.0));
        routes
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub(crate) fn request_response(&self, route: &str) -> Result<Arc<dyn RequestResponseHandler>> {
        match self.routes.get(route) {
            Some(RouteEntry::RequestResponse(handler)) => Ok(Arc::clone(handler)),
            Some(entry) => Err(Self::mismatch(
                route,
                entry.pattern(),
                InteractionPattern::RequestResponse,
            )),
            None => Err(SessionError::UnknownRoute(route.to_string())),
        }
    }

    pub(crate) fn fire_and_forget(&self, route: &str) -> Result<Arc<dyn FireAndForgetHandler>> {
        match self.routes.get(route) {
            Some(RouteEntry::FireAndForget(handler)) => Ok(Arc::clone(handler)),
            Some(entry) => Err(Self::mismatch(
                route,
                entry.pattern(),
                InteractionPattern::FireAndForget,
            )),
            None => Err(SessionError::UnknownRoute(route.to_string())),
        }
    }

    pub(crate) fn request_stream(&self, route: &str) -> Result<Arc<dyn StreamHandler>> {
        match self.routes.get(route) {
            Some(RouteEntry::RequestStream(handler)) => Ok(Arc::clone(handler)),
            Some(entry) => Err(Self::mismatch(
                route,
                entry.pattern(),
                InteractionPattern::RequestStream,
            )),
            None => Err(SessionError::UnknownRoute(route.to_string())),
        }
    }

    pub(crate) fn request_channel(&self, route: &str) -> Result<Arc<dyn ChannelHandler>> {
        match self.routes.get(route) {
            Some(RouteEntry::RequestChannel(handler)) => Ok(Arc::clone(handler)),
            Some(entry) => Err(Self::mismatch(
                route,
                entry.pattern(),
                InteractionPattern::RequestChannel,
            )),
            None => Err(SessionError::UnknownRoute(route.to_string())),
        }
    }

    fn mismatch(
        route: &str,
        actual: InteractionPattern,
        requested: InteractionPattern,
    ) -> SessionError {
        SessionError::PatternMismatch {
            route: route.to_string(),
            actual,
            requested,
        }
    }
}
