//! The batch boundary: typed JSON requests in, typed JSON responses out.
//!
//! Processing order is fixed: every `Stop` request, then every `Bus`
//! request, then one graph-and-router build, then the stat requests in
//! their original document order. A query that misses produces a
//! "not found" payload for that request only; fatal errors abort the whole
//! batch before anything is written.

pub mod requests;
pub mod responses;

use std::io;

use geo_types::Point;

use crate::error::Result;
use crate::render::MapRenderer;
use crate::routing::{RideGraph, Router};
use crate::transit::TransitCatalog;

pub use requests::{BaseRequest, BusData, InputDocument, StatRequest, StopData};
pub use responses::{MapStats, Response, RouteItem, RouteStats, StopStats};

/// Reads one input document, answers every query, writes the response array.
pub fn process(input: impl io::Read, mut output: impl io::Write) -> Result<()> {
    let document: InputDocument = serde_json::from_reader(input)?;
    let responses = run(document)?;
    serde_json::to_writer(&mut output, &responses)?;
    output.flush()?;
    Ok(())
}

/// Builds the network from a parsed document and answers its queries.
pub fn run(document: InputDocument) -> Result<Vec<Response>> {
    let InputDocument {
        routing_settings,
        render_settings,
        base_requests,
        stat_requests,
    } = document;

    let mut catalog = TransitCatalog::new();
    for request in &base_requests {
        if let BaseRequest::Stop(stop) = request {
            catalog.add_stop(
                &stop.name,
                Point::new(stop.longitude, stop.latitude),
                &stop.road_distances,
            );
        }
    }
    for request in &base_requests {
        if let BaseRequest::Bus(bus) = request {
            catalog.add_bus(&bus.name, &bus.stops, bus.is_roundtrip)?;
        }
    }
    log::debug!(
        "catalog built: {} stops, {} buses",
        catalog.stop_count(),
        catalog.bus_count()
    );

    let rides = RideGraph::build(&catalog, routing_settings);
    let mut router = Router::new(&rides);
    let mut renderer: Option<MapRenderer> = None;

    let mut answers = Vec::with_capacity(stat_requests.len());
    for request in &stat_requests {
        let response = match request {
            StatRequest::Bus { id, name } => match catalog.bus_metrics(name) {
                Some(metrics) => Response::bus(*id, metrics),
                None => Response::not_found(*id),
            },
            StatRequest::Stop { id, name } => match catalog.buses_at(name) {
                Some(buses) => Response::Stop(StopStats {
                    request_id: *id,
                    buses: buses.iter().cloned().collect(),
                }),
                None => Response::not_found(*id),
            },
            StatRequest::Route { id, from, to } => {
                match (rides.node(from), rides.node(to)) {
                    (Some(origin), Some(target)) => match router.build_route(origin, target) {
                        Some(summary) => {
                            let wait = routing_settings.wait_minutes();
                            let mut items = Vec::with_capacity(summary.edge_count * 2);
                            let mut edges = Vec::with_capacity(summary.edge_count);
                            for position in 0..summary.edge_count {
                                let edge_index = router.route_edge(summary.id, position);
                                edges.push(edge_index);
                                let ride = rides.edge(edge_index);
                                items.push(RouteItem::Wait {
                                    stop_name: ride.from.clone(),
                                    time: wait,
                                });
                                items.push(RouteItem::Bus {
                                    bus: ride.bus.clone(),
                                    time: ride.weight - wait,
                                    span_count: ride.span,
                                });
                            }
                            let renderer = renderer.get_or_insert_with(|| {
                                MapRenderer::new(&catalog, &render_settings)
                            });
                            Response::Route(RouteStats {
                                request_id: *id,
                                total_time: summary.total_time,
                                items,
                                map: renderer.render_route(&rides, &edges),
                            })
                        }
                        None => Response::not_found(*id),
                    },
                    _ => Response::not_found(*id),
                }
            }
            StatRequest::Map { id } => {
                let renderer = renderer
                    .get_or_insert_with(|| MapRenderer::new(&catalog, &render_settings));
                Response::Map(MapStats {
                    request_id: *id,
                    map: renderer.render_map(),
                })
            }
        };
        answers.push(response);
    }
    Ok(answers)
}
