use serde::Serialize;

use crate::transit::BusMetrics;

/// One element of the output array. Untagged: each variant contributes its
/// own fields next to the echoed `request_id`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    NotFound(NotFound),
    Bus(BusStats),
    Stop(StopStats),
    Route(RouteStats),
    Map(MapStats),
}

impl Response {
    /// The uniform answer for any query that misses.
    pub fn not_found(request_id: i64) -> Response {
        Response::NotFound(NotFound {
            request_id,
            error_message: "not found".to_string(),
        })
    }

    pub fn bus(request_id: i64, metrics: BusMetrics) -> Response {
        Response::Bus(BusStats {
            request_id,
            stop_count: metrics.stop_count,
            unique_stop_count: metrics.unique_stop_count,
            route_length: metrics.route_length,
            curvature: metrics.curvature,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct NotFound {
    pub request_id: i64,
    pub error_message: String,
}

#[derive(Debug, Serialize)]
pub struct BusStats {
    pub request_id: i64,
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub route_length: f64,
    pub curvature: f64,
}

#[derive(Debug, Serialize)]
pub struct StopStats {
    pub request_id: i64,
    pub buses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RouteStats {
    pub request_id: i64,
    pub total_time: f64,
    pub items: Vec<RouteItem>,
    pub map: String,
}

#[derive(Debug, Serialize)]
pub struct MapStats {
    pub request_id: i64,
    pub map: String,
}

/// Route legs alternate waiting at a stop and riding one bus.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum RouteItem {
    Wait { stop_name: String, time: f64 },
    Bus { bus: String, time: f64, span_count: usize },
}
