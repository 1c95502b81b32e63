//! Infrastructure layer for tabletalk
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus configuration file loading.

pub mod backend;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use backend::{
    gateway::HttpBackendGateway,
    proxy::{ProxyClient, ProxyError, FAILURE_MESSAGE},
};
pub use config::{ConfigLoader, FileBackendConfig, FileConfig, FileLogConfig, FileReplConfig};
pub use logging::JsonlTranscriptLogger;
