//! Error types

mod config;
mod detection;

pub use config::*;
pub use detection::*;
