//! HTTP implementation of the `BackendGateway` port.
//!
//! Serializes the two conversation endpoints' request bodies, forwards
//! them through [`ProxyClient`], and decodes the `conversation` field of
//! the reply. A reply that omits the field yields an empty history; a
//! reply whose field cannot be decoded is an [`GatewayError::InvalidResponse`].

use crate::backend::proxy::{ProxyClient, ProxyError};
use async_trait::async_trait;
use serde_json::{Value, json};
use tabletalk_application::{BackendGateway, GatewayError};
use tabletalk_domain::Message;

/// Logical sub-path for starting a conversation.
pub const START_PATH: &str = "conversation/start";
/// Logical sub-path for sending a message.
pub const MESSAGE_PATH: &str = "conversation/message";

/// Gateway adapter speaking the backend's JSON conversation protocol.
pub struct HttpBackendGateway {
    proxy: ProxyClient,
}

impl HttpBackendGateway {
    pub fn new(proxy: ProxyClient) -> Self {
        Self { proxy }
    }
}

impl From<ProxyError> for GatewayError {
    fn from(e: ProxyError) -> Self {
        match e {
            ProxyError::Transport(msg) => GatewayError::Transport(msg),
            ProxyError::Status { status, body } => GatewayError::Backend { status, body },
            ProxyError::Decode(msg) => GatewayError::InvalidResponse(msg),
        }
    }
}

/// Decode the `conversation` field of a backend reply.
///
/// A missing or null field falls back to the given conversation: empty
/// for a start (the server sent no history), the optimistic local copy
/// for a send (the reply just didn't echo it back).
fn decode_conversation(reply: Value, fallback: &[Message]) -> Result<Vec<Message>, GatewayError> {
    match reply.get("conversation") {
        None | Some(Value::Null) => Ok(fallback.to_vec()),
        Some(field) => serde_json::from_value(field.clone())
            .map_err(|e| GatewayError::InvalidResponse(format!("conversation field: {}", e))),
    }
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn start_conversation(&self) -> Result<Vec<Message>, GatewayError> {
        let reply = self.proxy.forward(START_PATH, json!({})).await?;
        decode_conversation(reply, &[])
    }

    async fn send_message(
        &self,
        message: &str,
        conversation: &[Message],
    ) -> Result<Vec<Message>, GatewayError> {
        let body = json!({
            "message": message,
            "conversation": conversation,
        });
        let reply = self.proxy.forward(MESSAGE_PATH, body).await?;
        decode_conversation(reply, conversation)
    }
}
