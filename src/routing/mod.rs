//! Minimum-time routing over the bus network.
//!
//! Built once after ingestion: [`RideGraph`] condenses every possible
//! no-transfer ride into a single weighted edge, and [`Router`] precomputes
//! all-pairs shortest paths over those edges.

pub mod graph;
pub mod router;

pub use graph::{RideEdge, RideGraph, RoutingSettings};
pub use router::{RouteSummary, Router};
