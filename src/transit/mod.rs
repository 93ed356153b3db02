//! The transit model: stops, bus lines and the road-distance table.

pub mod catalog;
pub mod geo_util;

pub use catalog::{BusMetrics, BusRecord, StopRecord, TransitCatalog};
