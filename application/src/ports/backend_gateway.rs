//! Backend gateway port
//!
//! Defines the interface for communicating with the assistant backend.
//! Implementations (adapters) live in the infrastructure layer; the
//! controller never sees a transport, only this boundary.

use async_trait::async_trait;
use tabletalk_domain::Message;
use thiserror::Error;

/// Errors that can occur at the backend boundary
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network-level failure reaching the backend (connection refused,
    /// DNS failure, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend reachable but returned a non-success status.
    #[error("Backend error (status {status}): {body}")]
    Backend { status: u16, body: String },

    /// Backend returned a payload the client could not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Gateway for assistant backend communication
///
/// Both operations are whole-message round trips; there is no streaming
/// or partial delivery at this boundary.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Start a new conversation, returning the server's opening history.
    async fn start_conversation(&self) -> Result<Vec<Message>, GatewayError>;

    /// Send a message together with the full local conversation; the
    /// returned conversation is authoritative and replaces local state.
    async fn send_message(
        &self,
        message: &str,
        conversation: &[Message],
    ) -> Result<Vec<Message>, GatewayError>;
}
