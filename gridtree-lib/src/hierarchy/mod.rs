//! Parent/child hierarchy over two flat record pages.
//!
//! The pieces, leaves first:
//!
//! - [`RelationshipDetector`] works out how child rows reference parent rows.
//! - [`build`] turns both pages into a node arena ([`HierarchyState`]).
//! - The expansion state machine and visible projection live on the state.
//! - [`HierarchyEngine`] ties them together, publishes [`HierarchyEvent`]s and
//!   records [`HierarchyMetrics`].

mod build;
mod detect;
mod engine;
mod events;
mod expansion;
mod metrics;
mod node;
mod projection;
mod relationship;
mod state;

pub use build::build;
pub use detect::*;
pub use engine::*;
pub use events::*;
pub use metrics::*;
pub use node::*;
pub use relationship::*;
pub use state::HierarchyState;
