//! Port definitions (interfaces implemented by the infrastructure layer)

pub mod backend_gateway;
pub mod conversation_logger;
