//! # interlace
//!
//! Bidirectional request/response, streaming, and channel interaction
//! patterns over a single logical session.
//!
//! ## Overview
//!
//! `interlace` is the interaction-model core of a multiplexed protocol:
//! one persistent logical connection carries independently-addressable
//! routes, and every route serves exactly one of four interaction
//! patterns, each with a fixed request/response cardinality:
//!
//! - **request-response** — one message in, one message out
//! - **fire-and-forget** — one message in, nothing out
//! - **request-stream** — one message in, an unbounded stream out
//! - **request-channel** — a stream in, a derived stream out
//!
//! Wire framing, transport security, and endpoint exposure are external
//! collaborators; this crate is the engine they call into.
//!
//! ## Quick Start
//!
//! ```rust
//! use interlace::{EchoHandler, Message, Router, Session, SessionConfig};
//!
//! # async fn example() -> interlace::Result<()> {
//! // Register routes at startup, then hand the table to the session
//! let mut router = Router::new();
//! router.register_request_response("my-request-response", EchoHandler)?;
//!
//! let session = Session::connect(SessionConfig::default(), router);
//!
//! let reply = session
//!     .request_response("my-request-response", Message::new("Client", "Server", "ping"))
//!     .await?;
//!
//! assert_eq!(reply.text, "In response to: ping");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Handler traits** — one per pattern, the seam applications implement
//! - **Router** — route table built once at startup, frozen afterwards
//! - **InteractionEngine** — enforces each pattern's cardinality
//! - **ChannelCorrelator** — stateful request-channel backend with
//!   switch semantics (each inbound message replaces the live producer)
//! - **InteractionStream** — cancellable handle over an infinite producer
//! - **Session** — one logical connection owning all of the above

pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod message;
pub mod route;
pub mod session;
pub mod stream;

// Re-export core types
pub use channel::ChannelCorrelator;
pub use config::SessionConfig;
pub use engine::InteractionEngine;
pub use error::{HandlerError, Result, SessionError};
pub use handler::{
    ChannelHandler, CountStream, EchoHandler, EchoStreamHandler, FireAndForgetHandler, LogSink,
    MessageStream, RequestResponseHandler, StreamHandler,
};
pub use message::Message;
pub use route::{InteractionPattern, Router};
pub use session::Session;
pub use stream::InteractionStream;
