//! Presentation layer for tabletalk
//!
//! This crate contains the CLI definition, the message renderer
//! (SQL blocks and markdown-to-ANSI), the in-flight spinner, and the
//! interactive chat REPL.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use output::markdown::render_markdown;
pub use output::renderer::MessageRenderer;
pub use progress::reporter::PendingSpinner;
