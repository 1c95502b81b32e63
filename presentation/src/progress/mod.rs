//! Progress indication

pub mod reporter;
