//! Application layer for tabletalk
//!
//! This crate contains the conversation controller use case and the port
//! definitions it depends on. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::backend_gateway::{BackendGateway, GatewayError};
pub use ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
pub use use_cases::conversation::{
    ConversationController, SendOutcome, SessionSnapshot, StartOutcome,
};
