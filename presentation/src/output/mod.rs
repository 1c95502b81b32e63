//! Message rendering

pub mod markdown;
pub mod renderer;
