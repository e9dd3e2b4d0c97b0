//! Hierarchy engine for grouped grid rendering
//!
//! Relates two flat record collections (a parent page and a child page),
//! builds a two-tier node arena from them, tracks expansion state and keeps
//! the ordered list of visible nodes that a virtualized grid renders.

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod model;

pub use config::*;
pub use hierarchy::HierarchyEngine;
