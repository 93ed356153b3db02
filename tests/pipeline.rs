//! End-to-end scenarios: full JSON documents through the service layer.

use float_eq::assert_float_eq;
use serde_json::{json, Value};

use transit_service::service::{run, InputDocument, Response, RouteItem};

fn render_settings() -> Value {
    json!({
        "width": 1200.0,
        "height": 500.0,
        "padding": 50.0,
        "stop_radius": 5.0,
        "line_width": 14.0,
        "outer_margin": 30.0,
        "stop_label_font_size": 20,
        "stop_label_offset": [7.0, -3.0],
        "bus_label_font_size": 20,
        "bus_label_offset": [7.0, 15.0],
        "underlayer_color": [255, 255, 255, 0.85],
        "underlayer_width": 3.0,
        "color_palette": ["green", [255, 160, 0], "red"],
        "layers": ["bus_lines", "bus_labels", "stop_points", "stop_labels"]
    })
}

fn document(routing: Value, base: Value, stats: Value) -> InputDocument {
    serde_json::from_value(json!({
        "routing_settings": routing,
        "render_settings": render_settings(),
        "base_requests": base,
        "stat_requests": stats,
    }))
    .unwrap()
}

#[test]
fn two_stop_bus_without_distances_has_unit_curvature() {
    let document = document(
        json!({"bus_wait_time": 6, "bus_velocity": 40}),
        json!([
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0},
            {"type": "Stop", "name": "B", "latitude": 55.01, "longitude": 37.0},
            {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
        ]),
        json!([{"type": "Bus", "id": 1, "name": "1"}]),
    );

    let responses = run(document).unwrap();
    assert_eq!(responses.len(), 1);
    match &responses[0] {
        Response::Bus(stats) => {
            assert_eq!(stats.request_id, 1);
            assert_eq!(stats.stop_count, 3);
            assert_eq!(stats.unique_stop_count, 2);
            assert_float_eq!(stats.curvature, 1.0, abs <= 1e-12);
            // ~2.2 km out and back on one hundredth of a degree of latitude.
            assert_float_eq!(stats.route_length, 2223.9, abs <= 1.0);
        }
        other => panic!("expected bus stats, got {other:?}"),
    }
}

#[test]
fn declared_distance_covers_the_reverse_leg() {
    let document = document(
        json!({"bus_wait_time": 6, "bus_velocity": 40}),
        json!([
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
             "road_distances": {"B": 1000}},
            {"type": "Stop", "name": "B", "latitude": 55.01, "longitude": 37.0},
            {"type": "Bus", "name": "1", "stops": ["A", "B", "A"], "is_roundtrip": true}
        ]),
        json!([{"type": "Bus", "id": 7, "name": "1"}]),
    );

    let responses = run(document).unwrap();
    match &responses[0] {
        Response::Bus(stats) => {
            assert_float_eq!(stats.route_length, 2000.0, abs <= 1e-9);
        }
        other => panic!("expected bus stats, got {other:?}"),
    }
}

#[test]
fn equal_time_rides_pick_the_lexicographically_first_bus() {
    let document = document(
        json!({"bus_wait_time": 6, "bus_velocity": 40}),
        json!([
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
             "road_distances": {"B": 2000}},
            {"type": "Stop", "name": "B", "latitude": 55.02, "longitude": 37.0,
             "road_distances": {"C": 2000}},
            {"type": "Stop", "name": "C", "latitude": 55.04, "longitude": 37.0},
            {"type": "Bus", "name": "Z", "stops": ["A", "B", "C"], "is_roundtrip": true},
            {"type": "Bus", "name": "M", "stops": ["A", "B", "C"], "is_roundtrip": true}
        ]),
        json!([{"type": "Route", "id": 3, "from": "A", "stop": "C"}]),
    );

    let responses = run(document).unwrap();
    match &responses[0] {
        Response::Route(route) => {
            assert_float_eq!(route.total_time, 12.0, abs <= 1e-9);
            assert_eq!(route.items.len(), 2);
            match &route.items[1] {
                RouteItem::Bus { bus, span_count, .. } => {
                    assert_eq!(bus, "M");
                    assert_eq!(*span_count, 2);
                }
                other => panic!("expected a ride, got {other:?}"),
            }
        }
        other => panic!("expected a route, got {other:?}"),
    }
}

#[test]
fn route_time_splits_into_wait_and_ride() {
    let document = document(
        json!({"bus_wait_time": 6, "bus_velocity": 40}),
        json!([
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
             "road_distances": {"B": 6000}},
            {"type": "Stop", "name": "B", "latitude": 55.05, "longitude": 37.0},
            {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
        ]),
        json!([{"type": "Route", "id": 11, "from": "A", "stop": "B"}]),
    );

    let responses = run(document).unwrap();
    match &responses[0] {
        Response::Route(route) => {
            assert_float_eq!(route.total_time, 15.0, abs <= 1e-9);
            match &route.items[0] {
                RouteItem::Wait { stop_name, time } => {
                    assert_eq!(stop_name, "A");
                    assert_float_eq!(*time, 6.0, abs <= 1e-12);
                }
                other => panic!("expected a wait, got {other:?}"),
            }
            match &route.items[1] {
                RouteItem::Bus {
                    bus,
                    time,
                    span_count,
                } => {
                    assert_eq!(bus, "1");
                    assert_float_eq!(*time, 9.0, abs <= 1e-9);
                    assert_eq!(*span_count, 1);
                }
                other => panic!("expected a ride, got {other:?}"),
            }
            assert!(route.map.starts_with("<?xml"));
        }
        other => panic!("expected a route, got {other:?}"),
    }
}

#[test]
fn collinear_stops_never_collide_and_maps_are_reproducible() {
    let base = json!([
        {"type": "Stop", "name": "A", "latitude": 55.00, "longitude": 37.0},
        {"type": "Stop", "name": "B", "latitude": 55.01, "longitude": 37.0},
        {"type": "Stop", "name": "C", "latitude": 55.02, "longitude": 37.0},
        {"type": "Stop", "name": "D", "latitude": 55.03, "longitude": 37.0},
        {"type": "Bus", "name": "1", "stops": ["A", "B", "C", "D"], "is_roundtrip": false}
    ]);
    let stats = json!([
        {"type": "Map", "id": 1},
        {"type": "Map", "id": 2}
    ]);
    let document = document(
        json!({"bus_wait_time": 6, "bus_velocity": 40}),
        base,
        stats,
    );

    let responses = run(document).unwrap();
    let maps: Vec<&str> = responses
        .iter()
        .map(|response| match response {
            Response::Map(map) => map.map.as_str(),
            other => panic!("expected a map, got {other:?}"),
        })
        .collect();
    assert_eq!(maps[0], maps[1]);

    // Four stop circles on distinct columns and rows.
    let centers: Vec<(&str, &str)> = maps[0]
        .match_indices("<circle")
        .map(|(start, _)| {
            let tail = &maps[0][start..];
            let cx = attribute(tail, "cx");
            let cy = attribute(tail, "cy");
            (cx, cy)
        })
        .collect();
    assert_eq!(centers.len(), 4);
    for (i, a) in centers.iter().enumerate() {
        for b in centers.iter().skip(i + 1) {
            assert_ne!(a.0, b.0);
            assert_ne!(a.1, b.1);
        }
    }
}

#[test]
fn unroutable_pairs_fail_alone() {
    let document = document(
        json!({"bus_wait_time": 6, "bus_velocity": 40}),
        json!([
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
             "road_distances": {"B": 1000}},
            {"type": "Stop", "name": "B", "latitude": 55.01, "longitude": 37.0},
            {"type": "Stop", "name": "X", "latitude": 56.0, "longitude": 38.0,
             "road_distances": {"Y": 1000}},
            {"type": "Stop", "name": "Y", "latitude": 56.01, "longitude": 38.0},
            {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false},
            {"type": "Bus", "name": "2", "stops": ["X", "Y"], "is_roundtrip": false}
        ]),
        json!([
            {"type": "Bus", "id": 1, "name": "1"},
            {"type": "Route", "id": 2, "from": "A", "stop": "X"},
            {"type": "Stop", "id": 3, "name": "B"},
            {"type": "Stop", "id": 4, "name": "Ghost"}
        ]),
    );

    let responses = run(document).unwrap();
    assert_eq!(responses.len(), 4);
    assert!(matches!(&responses[0], Response::Bus(_)));
    match &responses[1] {
        Response::NotFound(missing) => {
            assert_eq!(missing.request_id, 2);
            assert_eq!(missing.error_message, "not found");
        }
        other => panic!("expected not found, got {other:?}"),
    }
    match &responses[2] {
        Response::Stop(stop) => assert_eq!(stop.buses, ["1"]),
        other => panic!("expected stop stats, got {other:?}"),
    }
    assert!(matches!(&responses[3], Response::NotFound(_)));
}

#[test]
fn transfer_routes_alternate_waits_and_rides() {
    let document = document(
        json!({"bus_wait_time": 2, "bus_velocity": 48}),
        json!([
            {"type": "Stop", "name": "Depot", "latitude": 55.00, "longitude": 37.00,
             "road_distances": {"Market": 4000}},
            {"type": "Stop", "name": "Market", "latitude": 55.00, "longitude": 37.05,
             "road_distances": {"Harbor": 4000}},
            {"type": "Stop", "name": "Harbor", "latitude": 55.05, "longitude": 37.05},
            {"type": "Bus", "name": "east", "stops": ["Depot", "Market"], "is_roundtrip": false},
            {"type": "Bus", "name": "north", "stops": ["Market", "Harbor"], "is_roundtrip": false}
        ]),
        json!([{"type": "Route", "id": 21, "from": "Depot", "stop": "Harbor"}]),
    );

    let responses = run(document).unwrap();
    match &responses[0] {
        Response::Route(route) => {
            // Two legs of 2 min wait + 5 min ride each.
            assert_float_eq!(route.total_time, 14.0, abs <= 1e-9);
            assert_eq!(route.items.len(), 4);
            let legs: Vec<(&str, &str)> = route
                .items
                .chunks(2)
                .map(|pair| match pair {
                    [RouteItem::Wait { stop_name, .. }, RouteItem::Bus { bus, .. }] => {
                        (stop_name.as_str(), bus.as_str())
                    }
                    other => panic!("expected wait-ride pair, got {other:?}"),
                })
                .collect();
            assert_eq!(legs, [("Depot", "east"), ("Market", "north")]);

            // The overlay redraws both ridden lines over the backdrop.
            let backdrop = route.map.find("<rect").unwrap();
            let overlay = &route.map[backdrop..];
            assert!(overlay.contains(">east</text>"));
            assert!(overlay.contains(">north</text>"));
            assert!(overlay.contains(">Harbor</text>"));
        }
        other => panic!("expected a route, got {other:?}"),
    }
}

#[test]
fn stops_without_buses_still_reach_the_map() {
    let document = document(
        json!({"bus_wait_time": 6, "bus_velocity": 40}),
        json!([
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0},
            {"type": "Stop", "name": "B", "latitude": 55.01, "longitude": 37.01},
            {"type": "Stop", "name": "Outpost", "latitude": 55.02, "longitude": 37.02},
            {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
        ]),
        json!([
            {"type": "Stop", "id": 1, "name": "Outpost"},
            {"type": "Map", "id": 2}
        ]),
    );

    let responses = run(document).unwrap();
    match &responses[0] {
        Response::Stop(stop) => assert!(stop.buses.is_empty()),
        other => panic!("expected stop stats, got {other:?}"),
    }
    match &responses[1] {
        Response::Map(map) => {
            assert!(map.map.contains(">Outpost</text>"));
            assert_eq!(map.map.matches("<circle").count(), 3);
        }
        other => panic!("expected a map, got {other:?}"),
    }
}

#[test]
fn process_writes_escaped_svg_into_the_output_stream() {
    let input = json!({
        "routing_settings": {"bus_wait_time": 6, "bus_velocity": 40},
        "render_settings": render_settings(),
        "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0},
            {"type": "Stop", "name": "B", "latitude": 55.01, "longitude": 37.0},
            {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
        ],
        "stat_requests": [{"type": "Map", "id": 5}]
    })
    .to_string();

    let mut output = Vec::new();
    transit_service::service::process(input.as_bytes(), &mut output).unwrap();
    let raw = String::from_utf8(output).unwrap();

    // The embedded SVG keeps its quotes behind single backslashes.
    assert!(raw.contains(r#"<?xml version=\"1.0\" encoding=\"UTF-8\" ?>"#));

    let parsed: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed[0]["request_id"], 5);
    assert!(parsed[0]["map"].as_str().unwrap().contains("<svg"));
}

#[test]
fn malformed_documents_are_rejected_before_output() {
    let mut output = Vec::new();
    let result = transit_service::service::process(
        "{\"routing_settings\": {}".as_bytes(),
        &mut output,
    );
    assert!(result.is_err());
    assert!(output.is_empty());
}

/// Extracts the raw text of an SVG attribute from the start of `tail`.
fn attribute<'a>(tail: &'a str, name: &str) -> &'a str {
    let marker = format!("{name}=\"");
    let start = tail.find(&marker).unwrap() + marker.len();
    let end = tail[start..].find('"').unwrap();
    &tail[start..start + end]
}
