//! Session configuration
//!
//! Connection parameters for the transport layer that carries the session.
//! The crate itself opens no sockets; the configured endpoint is recorded
//! on the session and handed to whatever bootstraps the connection.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    7000
}

/// Connection parameters for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Host the session connects to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the session connects to
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl SessionConfig {
    /// Create a config for an explicit endpoint
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The endpoint as `host:port`
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
