//! Backend boundary adapters
//!
//! [`proxy::ProxyClient`] is the transparent HTTP relay; it forwards
//! serialized bodies to the configured base URL and knows nothing about
//! conversations. [`gateway::HttpBackendGateway`] sits on top of it and
//! implements the application's `BackendGateway` port.

pub mod gateway;
pub mod proxy;
