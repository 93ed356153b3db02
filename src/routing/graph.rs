use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::Directed;
use serde::Deserialize;

use crate::transit::TransitCatalog;

/// Parameters shared by every ride edge: the wait before boarding any bus
/// and the cruising speed used to turn road meters into minutes.
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct RoutingSettings {
    /// Minutes spent at a stop before any boarding.
    pub bus_wait_time: u32,
    /// Bus speed in km/h.
    pub bus_velocity: u32,
}

impl RoutingSettings {
    pub fn wait_minutes(&self) -> f64 {
        f64::from(self.bus_wait_time)
    }

    pub fn velocity_m_per_min(&self) -> f64 {
        f64::from(self.bus_velocity) * 1000.0 / 60.0
    }
}

/// One "ride this bus for `span` stops" edge of the routing graph.
///
/// The weight already includes the boarding wait, so a transfer is priced
/// simply by chaining two edges.
#[derive(Clone, Debug)]
pub struct RideEdge {
    pub weight: f64,
    pub from: String,
    pub to: String,
    pub bus: String,
    pub span: usize,
}

/// The routing graph over all stops.
///
/// Vertices are stops in ascending name order; edges are the surviving best
/// rides between ordered stop pairs. [`RideEdge`] records are parallel to
/// petgraph's edge indices.
pub struct RideGraph {
    graph: Graph<String, f64, Directed>,
    node_by_stop: HashMap<String, NodeIndex>,
    edges: Vec<RideEdge>,
    settings: RoutingSettings,
}

impl RideGraph {
    /// Synthesizes ride edges from a frozen catalog.
    ///
    /// For every bus and every ordered pair of positions on its stored
    /// sequence, one candidate ride is produced; for each ordered stop pair
    /// only the minimum `(weight, bus name, span)` candidate survives, which
    /// pins the tie-break order between equally fast rides.
    pub fn build(catalog: &TransitCatalog, settings: RoutingSettings) -> RideGraph {
        let mut graph = Graph::new();
        let mut node_by_stop = HashMap::with_capacity(catalog.stop_count());
        for name in catalog.stops().keys() {
            let index = graph.add_node(name.clone());
            node_by_stop.insert(name.clone(), index);
        }

        let velocity = settings.velocity_m_per_min();
        let mut best: BTreeMap<(String, String), (f64, String, usize)> = BTreeMap::new();
        for (bus_name, bus) in catalog.buses() {
            let stops = &bus.stops;
            for start in 0..stops.len().saturating_sub(1) {
                let mut weight = settings.wait_minutes();
                for end in start + 1..stops.len() {
                    weight += catalog.leg_distance(&stops[end - 1], &stops[end]) / velocity;
                    let candidate = (weight, bus_name.clone(), end - start);
                    match best.entry((stops[start].clone(), stops[end].clone())) {
                        Entry::Vacant(slot) => {
                            slot.insert(candidate);
                        }
                        Entry::Occupied(mut slot) => {
                            if candidate_ordering(&candidate, slot.get()).is_lt() {
                                slot.insert(candidate);
                            }
                        }
                    }
                }
            }
        }

        let mut edges = Vec::with_capacity(best.len());
        for ((from, to), (weight, bus, span)) in best {
            let edge = graph.add_edge(node_by_stop[&from], node_by_stop[&to], weight);
            debug_assert_eq!(edge.index(), edges.len());
            edges.push(RideEdge {
                weight,
                from,
                to,
                bus,
                span,
            });
        }

        log::debug!(
            "ride graph: {} vertices, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        RideGraph {
            graph,
            node_by_stop,
            edges,
            settings,
        }
    }

    pub fn graph(&self) -> &Graph<String, f64, Directed> {
        &self.graph
    }

    pub fn settings(&self) -> RoutingSettings {
        self.settings
    }

    /// Vertex of a stop, or `None` for a name the catalog never saw.
    pub fn node(&self, stop: &str) -> Option<NodeIndex> {
        self.node_by_stop.get(stop).copied()
    }

    pub fn edge(&self, index: EdgeIndex) -> &RideEdge {
        &self.edges[index.index()]
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

fn candidate_ordering(
    a: &(f64, String, usize),
    b: &(f64, String, usize),
) -> std::cmp::Ordering {
    a.0.total_cmp(&b.0)
        .then_with(|| a.1.cmp(&b.1))
        .then_with(|| a.2.cmp(&b.2))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use geo_types::Point;
    use petgraph::visit::EdgeRef;

    use super::*;

    fn small_catalog() -> TransitCatalog {
        let mut catalog = TransitCatalog::new();
        let distances: HashMap<String, f64> = [("B".to_string(), 6000.0)].into();
        catalog.add_stop("A", Point::new(37.0, 55.0), &distances);
        catalog.add_stop("B", Point::new(37.0, 55.05), &HashMap::new());
        catalog
            .add_bus("1", &["A".to_string(), "B".to_string()], false)
            .unwrap();
        catalog
    }

    fn settings() -> RoutingSettings {
        RoutingSettings {
            bus_wait_time: 6,
            bus_velocity: 40,
        }
    }

    #[test]
    fn vertices_follow_stop_name_order() {
        let rides = RideGraph::build(&small_catalog(), settings());
        assert_eq!(rides.node("A").unwrap().index(), 0);
        assert_eq!(rides.node("B").unwrap().index(), 1);
        assert!(rides.node("C").is_none());
    }

    #[test]
    fn ride_weight_prepays_the_wait() {
        let rides = RideGraph::build(&small_catalog(), settings());
        // 6000 m at 40 km/h is 9 minutes, plus the 6 minute wait.
        let direct = rides
            .graph()
            .edge_references()
            .find(|e| {
                let ride = rides.edge(e.id());
                ride.from == "A" && ride.to == "B"
            })
            .unwrap();
        float_eq::assert_float_eq!(*direct.weight(), 15.0, abs <= 1e-12);

        for index in 0..rides.edge_count() {
            let ride = rides.edge(EdgeIndex::new(index));
            assert!(ride.weight >= rides.settings().wait_minutes());
        }
    }

    #[test]
    fn equal_weight_candidates_resolve_by_bus_name() {
        let mut catalog = TransitCatalog::new();
        let distances: HashMap<String, f64> = [("B".to_string(), 2000.0)].into();
        catalog.add_stop("A", Point::new(37.0, 55.0), &distances);
        let distances: HashMap<String, f64> = [("C".to_string(), 2000.0)].into();
        catalog.add_stop("B", Point::new(37.0, 55.02), &distances);
        catalog.add_stop("C", Point::new(37.0, 55.04), &HashMap::new());
        let stops: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        catalog.add_bus("Z", &stops, true).unwrap();
        catalog.add_bus("M", &stops, true).unwrap();

        let rides = RideGraph::build(&catalog, settings());
        let a_to_c = (0..rides.edge_count())
            .map(|i| rides.edge(EdgeIndex::new(i)))
            .find(|ride| ride.from == "A" && ride.to == "C")
            .unwrap();
        assert_eq!(a_to_c.bus, "M");
        assert_eq!(a_to_c.span, 2);
    }
}
