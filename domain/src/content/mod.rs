//! Content classification for message presentation

pub mod classifier;
