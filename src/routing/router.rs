use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::graph::RideGraph;

#[derive(Copy, Clone, Debug)]
struct PathCell {
    weight: f64,
    /// Last edge on the best path into this cell; `None` only on the diagonal.
    last_edge: Option<EdgeIndex>,
}

/// Summary of a route materialized by [`Router::build_route`].
#[derive(Copy, Clone, Debug)]
pub struct RouteSummary {
    pub id: usize,
    pub total_time: f64,
    pub edge_count: usize,
}

/// All-pairs shortest-path router over a [`RideGraph`].
///
/// The full distance table is computed once up front by tabular relaxation
/// through every intermediate vertex, keeping the last edge of each best
/// path. A query then only walks the table backwards, and the materialized
/// edge list is cached behind an opaque route id for later retrieval.
pub struct Router<'g> {
    rides: &'g RideGraph,
    table: Vec<Vec<Option<PathCell>>>,
    expanded: Vec<Vec<EdgeIndex>>,
}

impl<'g> Router<'g> {
    pub fn new(rides: &'g RideGraph) -> Router<'g> {
        let n = rides.vertex_count();
        let mut table: Vec<Vec<Option<PathCell>>> = vec![vec![None; n]; n];
        for v in 0..n {
            table[v][v] = Some(PathCell {
                weight: 0.0,
                last_edge: None,
            });
        }
        for edge in rides.graph().edge_references() {
            let (u, v) = (edge.source().index(), edge.target().index());
            let weight = *edge.weight();
            let better = table[u][v].map_or(true, |cell| weight < cell.weight);
            if better {
                table[u][v] = Some(PathCell {
                    weight,
                    last_edge: Some(edge.id()),
                });
            }
        }
        for via in 0..n {
            for from in 0..n {
                let Some(head) = table[from][via] else {
                    continue;
                };
                for to in 0..n {
                    let Some(tail) = table[via][to] else {
                        continue;
                    };
                    let weight = head.weight + tail.weight;
                    let better = table[from][to].map_or(true, |cell| weight < cell.weight);
                    if better {
                        table[from][to] = Some(PathCell {
                            weight,
                            last_edge: tail.last_edge,
                        });
                    }
                }
            }
        }

        Router {
            rides,
            table,
            expanded: Vec::new(),
        }
    }

    /// Materializes the best route between two vertices.
    ///
    /// Returns `None` when no path exists. The edge list is retained until
    /// [`Router::release_route`]; fetch edges with [`Router::route_edge`].
    pub fn build_route(&mut self, from: NodeIndex, to: NodeIndex) -> Option<RouteSummary> {
        let target = self.table[from.index()][to.index()]?;

        let mut edges = Vec::new();
        let mut cursor = to.index();
        while cursor != from.index() {
            let edge = self.table[from.index()][cursor]
                .and_then(|cell| cell.last_edge)
                .expect("reachable off-diagonal cells always carry an edge");
            edges.push(edge);
            let (source, _) = self
                .rides
                .graph()
                .edge_endpoints(edge)
                .expect("table edges come from this graph");
            cursor = source.index();
        }
        edges.reverse();

        let id = self.expanded.len();
        let edge_count = edges.len();
        self.expanded.push(edges);
        Some(RouteSummary {
            id,
            total_time: target.weight,
            edge_count,
        })
    }

    /// The i-th edge of a previously materialized route.
    pub fn route_edge(&self, route_id: usize, position: usize) -> EdgeIndex {
        self.expanded[route_id][position]
    }

    /// Drops the edge list of a materialized route; its id stays burned.
    pub fn release_route(&mut self, route_id: usize) {
        self.expanded[route_id].clear();
    }
}
