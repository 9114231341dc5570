//! Error types for interlace
//!
//! Cancellation is not represented here: cancelling a stream or channel is
//! a normal way to end an infinite sequence and surfaces as `Ok(None)` from
//! the handle, never as an error.

use crate::route::InteractionPattern;
use thiserror::Error;

/// Boxed error returned by user-supplied handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur on a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// Dispatch to a route with no registered handler
    #[error("No handler registered for route '{0}'")]
    UnknownRoute(String),

    /// A handler is already registered under this route
    #[error("Route '{route}' is already registered for {pattern} interactions")]
    DuplicateRoute {
        route: String,
        pattern: InteractionPattern,
    },

    /// The route exists but serves a different interaction pattern
    #[error("Route '{route}' serves {actual} interactions, not {requested}")]
    PatternMismatch {
        route: String,
        actual: InteractionPattern,
        requested: InteractionPattern,
    },

    /// A handler failed while serving an interaction
    #[error("Handler for route '{route}' failed: {source}")]
    Interaction {
        route: String,
        #[source]
        source: HandlerError,
    },

    /// A producer died without completing its sequence
    #[error("Producer for route '{route}' failed: {reason}")]
    Producer {
        route: String,
        reason: String,
    },
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
