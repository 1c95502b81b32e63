//! Application use cases

pub mod conversation;
