//! Configuration loading

pub mod file_config;
pub mod loader;

pub use file_config::{FileBackendConfig, FileConfig, FileLogConfig, FileReplConfig};
pub use loader::ConfigLoader;
