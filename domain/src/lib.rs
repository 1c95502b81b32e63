//! Domain layer for tabletalk
//!
//! This crate contains the core conversation entities and pure logic.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A conversation session is an ordered sequence of [`Message`]s plus a
//! draft input and an explicit phase (`Idle` / `Starting` / `Sending`).
//! The phase machine serializes backend round trips: at most one request
//! is ever outstanding per session.
//!
//! ## Content classification
//!
//! Assistant turns carry lightweight inline markers (`SQL:` for query
//! output, `USER: ` for echoed provenance). [`classify`] is the single
//! pure function that maps raw content to a presentation category.

pub mod content;
pub mod session;

// Re-export commonly used types
pub use content::classifier::{Classified, ContentKind, classify};
pub use session::entities::{Message, Role};
pub use session::state::{SessionPhase, SessionState};
