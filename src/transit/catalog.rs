use std::collections::{BTreeMap, BTreeSet, HashMap};

use geo_types::Point;

use crate::error::{Error, Result};

use super::geo_util;

/// A stop of the network: location plus the set of bus lines serving it.
#[derive(Clone, Debug)]
pub struct StopRecord {
    pub location: Point<f64>,
    pub buses: BTreeSet<String>,
}

/// A bus line with its canonical stop sequence and derived metrics.
///
/// For a line that is not a round trip the stored sequence is the full
/// out-and-back walk, so `stops.first() == stops.last()` always holds and the
/// turnaround is the middle element.
#[derive(Clone, Debug)]
pub struct BusRecord {
    pub stops: Vec<String>,
    pub is_round_trip: bool,
    pub route_length: f64,
    pub geo_length: f64,
    pub unique_stop_count: usize,
}

impl BusRecord {
    pub fn curvature(&self) -> f64 {
        self.route_length / self.geo_length
    }

    /// Index of the turnaround stop in the stored sequence.
    pub fn turnaround_index(&self) -> usize {
        self.stops.len() / 2
    }
}

/// Aggregate answer to a bus info query.
#[derive(Clone, Copy, Debug)]
pub struct BusMetrics {
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub route_length: f64,
    pub curvature: f64,
}

/// The static description of the bus network.
///
/// Stops and buses are kept in name-ordered maps; every consumer that walks
/// them (graph construction, layout, rendering) inherits that order, which is
/// what makes the whole pipeline reproducible. The road-distance table is
/// directional: a declared `(from, to)` entry always wins, and the reverse
/// direction is filled with the same value only while undeclared.
#[derive(Debug, Default)]
pub struct TransitCatalog {
    stops: BTreeMap<String, StopRecord>,
    buses: BTreeMap<String, BusRecord>,
    road_distances: HashMap<String, HashMap<String, f64>>,
}

impl TransitCatalog {
    pub fn new() -> TransitCatalog {
        TransitCatalog::default()
    }

    /// Registers a stop and its declared road distances.
    ///
    /// Re-adding a stop replaces its location and clears its bus set; the
    /// ingestion order (all stops before all buses) makes that harmless.
    pub fn add_stop(&mut self, name: &str, location: Point<f64>, distances: &HashMap<String, f64>) {
        self.stops.insert(name.to_string(), StopRecord {
            location,
            buses: BTreeSet::new(),
        });
        for (other, &meters) in distances {
            self.road_distances
                .entry(name.to_string())
                .or_default()
                .insert(other.clone(), meters);
            self.road_distances
                .entry(other.clone())
                .or_default()
                .entry(name.to_string())
                .or_insert(meters);
        }
    }

    /// Registers a bus line over already-known stops.
    ///
    /// The input sequence of a non-round-trip line is mirrored before
    /// storage, so a request for `A > B > C` stores `A B C B A`. Derived
    /// metrics are computed immediately; a leg without a declared road
    /// distance falls back to the geodesic distance.
    pub fn add_bus(&mut self, name: &str, route: &[String], is_round_trip: bool) -> Result<()> {
        let mut stored = route.to_vec();
        if !is_round_trip {
            stored.extend(route.iter().rev().skip(1).cloned());
        }

        for stop in &stored {
            if !self.stops.contains_key(stop) {
                return Err(Error::UnknownStop {
                    bus: name.to_string(),
                    stop: stop.clone(),
                });
            }
        }

        let mut route_length = 0.0;
        let mut geo_length = 0.0;
        for leg in stored.windows(2) {
            let geo = self.geo_distance(&leg[0], &leg[1]);
            geo_length += geo;
            route_length += match self.road_distance(&leg[0], &leg[1]) {
                Some(meters) => meters,
                None => {
                    log::warn!(
                        "bus {}: no road distance {} -> {}, using geodesic",
                        name,
                        leg[0],
                        leg[1]
                    );
                    geo
                }
            };
        }
        let unique_stop_count = stored.iter().collect::<BTreeSet<_>>().len();

        for stop in &stored {
            self.stops
                .get_mut(stop)
                .expect("stop presence checked above")
                .buses
                .insert(name.to_string());
        }
        self.buses.insert(name.to_string(), BusRecord {
            stops: stored,
            is_round_trip,
            route_length,
            geo_length,
            unique_stop_count,
        });
        Ok(())
    }

    /// The declared road distance for the exact direction `from -> to`.
    pub fn road_distance(&self, from: &str, to: &str) -> Option<f64> {
        self.road_distances.get(from)?.get(to).copied()
    }

    /// Road distance of one leg with the geodesic fallback applied.
    pub fn leg_distance(&self, from: &str, to: &str) -> f64 {
        self.road_distance(from, to)
            .unwrap_or_else(|| self.geo_distance(from, to))
    }

    fn geo_distance(&self, from: &str, to: &str) -> f64 {
        geo_util::great_circle_distance(self.stops[from].location, self.stops[to].location)
    }

    pub fn bus_metrics(&self, name: &str) -> Option<BusMetrics> {
        let bus = self.buses.get(name)?;
        Some(BusMetrics {
            stop_count: bus.stops.len(),
            unique_stop_count: bus.unique_stop_count,
            route_length: bus.route_length,
            curvature: bus.curvature(),
        })
    }

    /// Bus names serving a stop, or `None` for an unknown stop.
    pub fn buses_at(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.stops.get(name).map(|stop| &stop.buses)
    }

    pub fn stop(&self, name: &str) -> Option<&StopRecord> {
        self.stops.get(name)
    }

    pub fn bus(&self, name: &str) -> Option<&BusRecord> {
        self.buses.get(name)
    }

    pub fn stops(&self) -> &BTreeMap<String, StopRecord> {
        &self.stops
    }

    pub fn buses(&self) -> &BTreeMap<String, BusRecord> {
        &self.buses
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }
}
