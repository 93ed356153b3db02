use std::collections::HashMap;

use serde::Deserialize;

use crate::render::RenderSettings;
use crate::routing::RoutingSettings;

/// The whole batch input: settings, network description, queries.
#[derive(Debug, Deserialize)]
pub struct InputDocument {
    pub routing_settings: RoutingSettings,
    pub render_settings: RenderSettings,
    pub base_requests: Vec<BaseRequest>,
    pub stat_requests: Vec<StatRequest>,
}

/// A network-building request. All `Stop` entries are applied before any
/// `Bus` entry regardless of their order in the document.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop(StopData),
    Bus(BusData),
}

#[derive(Debug, Deserialize)]
pub struct StopData {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Declared road distances to other stops, in meters.
    #[serde(default)]
    pub road_distances: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct BusData {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

/// A query against the built network, answered in document order.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    Bus {
        id: i64,
        name: String,
    },
    Stop {
        id: i64,
        name: String,
    },
    Route {
        id: i64,
        from: String,
        /// Destination stop name.
        #[serde(rename = "stop")]
        to: String,
    },
    Map {
        id: i64,
    },
}
