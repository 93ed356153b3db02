//! Batch transit information service.
//!
//! Ingests a static bus network description plus rendering parameters from a
//! single JSON document, then answers bus, stop, route and map queries. The
//! heavy lifting is split across [`transit`] (the network model),
//! [`routing`] (ride-edge graph and all-pairs router), [`render`] (map
//! projection and SVG output) and [`service`] (the JSON boundary).

pub mod error;
pub mod render;
pub mod routing;
pub mod service;
pub mod svg;
pub mod transit;

pub use error::{Error, Result};
pub use render::MapRenderer;
pub use routing::{RideGraph, Router, RoutingSettings};
pub use transit::TransitCatalog;
