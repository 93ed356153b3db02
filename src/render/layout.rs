use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::svg::Point;
use crate::transit::TransitCatalog;

use super::settings::RenderSettings;

/// Stops adjacent on some bus, in either direction.
type Adjacency = HashMap<String, HashSet<String>>;

struct PlotStop {
    name: String,
    lat: f64,
    lon: f64,
}

/// Deterministic projection of every stop onto the canvas.
///
/// The projection first straightens each line by interpolating non-anchor
/// stops between their surrounding anchors, then compresses each axis onto
/// integer ranks such that stops adjacent on any bus never share a row or a
/// column.
pub struct MapLayout {
    positions: BTreeMap<String, Point>,
}

impl MapLayout {
    pub fn compute(catalog: &TransitCatalog, settings: &RenderSettings) -> MapLayout {
        let mut points: Vec<PlotStop> = catalog
            .stops()
            .iter()
            .map(|(name, stop)| PlotStop {
                name: name.clone(),
                lat: stop.location.y(),
                lon: stop.location.x(),
            })
            .collect();

        let mut adjacency = Adjacency::new();
        let anchors = anchor_stops(catalog, &mut adjacency);
        interpolate_between_anchors(catalog, &anchors, &mut points);

        let mut positions = BTreeMap::new();

        points.sort_by(|a, b| a.lon.total_cmp(&b.lon));
        let ranks = compression_ranks(&points, &adjacency);
        let step = axis_step(settings.width, settings.padding, &ranks);
        for (point, rank) in points.iter().zip(&ranks) {
            positions.insert(
                point.name.clone(),
                Point::new(settings.padding + step * *rank as f64, 0.0),
            );
        }

        points.sort_by(|a, b| a.lat.total_cmp(&b.lat));
        let ranks = compression_ranks(&points, &adjacency);
        let step = axis_step(settings.height, settings.padding, &ranks);
        for (point, rank) in points.iter().zip(&ranks) {
            let position = positions
                .get_mut(&point.name)
                .expect("both passes see the same stops");
            position.y = settings.height - settings.padding - step * *rank as f64;
        }

        MapLayout { positions }
    }

    /// Canvas position of a stop known to the catalog.
    pub fn position(&self, stop: &str) -> Point {
        self.positions[stop]
    }
}

/// Collects the anchor stops and, along the way, the adjacency relation.
///
/// Anchors are the stops whose geographic position is kept as-is: termini,
/// turnarounds of non-round-trip lines, stops visited more than twice by one
/// line, stops shared by several lines, and stops served by no line at all.
fn anchor_stops(catalog: &TransitCatalog, adjacency: &mut Adjacency) -> BTreeSet<String> {
    let mut anchors = BTreeSet::new();
    let mut lines_per_stop: HashMap<&str, usize> = HashMap::new();

    for bus in catalog.buses().values() {
        let stops = &bus.stops;
        anchors.insert(stops[0].clone());
        anchors.insert(stops[stops.len() - 1].clone());
        if !bus.is_round_trip {
            anchors.insert(stops[bus.turnaround_index()].clone());
        }

        let mut visits: HashMap<&str, usize> = HashMap::new();
        for stop in stops {
            let count = visits.entry(stop).or_insert(0);
            *count += 1;
            if *count > 2 {
                anchors.insert(stop.clone());
            } else if *count == 1 {
                let lines = lines_per_stop.entry(stop).or_insert(0);
                *lines += 1;
                if *lines >= 2 {
                    anchors.insert(stop.clone());
                }
            }
        }

        for leg in stops.windows(2) {
            adjacency
                .entry(leg[0].clone())
                .or_default()
                .insert(leg[1].clone());
            adjacency
                .entry(leg[1].clone())
                .or_default()
                .insert(leg[0].clone());
        }
    }

    for name in catalog.stops().keys() {
        if !lines_per_stop.contains_key(name.as_str()) {
            anchors.insert(name.clone());
        }
    }
    anchors
}

/// Overwrites the coordinates of every non-anchor stop by walking each line
/// and spacing the stops of every anchor-to-anchor run uniformly.
fn interpolate_between_anchors(
    catalog: &TransitCatalog,
    anchors: &BTreeSet<String>,
    points: &mut [PlotStop],
) {
    let mut coords: BTreeMap<String, (f64, f64)> = points
        .iter()
        .map(|p| (p.name.clone(), (p.lat, p.lon)))
        .collect();

    for bus in catalog.buses().values() {
        let stops = &bus.stops;
        let anchor_positions: Vec<usize> = stops
            .iter()
            .enumerate()
            .filter(|(_, stop)| anchors.contains(*stop))
            .map(|(i, _)| i)
            .collect();

        let mut passed = 0usize;
        for (i, stop) in stops.iter().enumerate() {
            if anchors.contains(stop) {
                passed += 1;
                continue;
            }
            let left = anchor_positions[passed - 1];
            let right = anchor_positions[passed];
            let fraction = (i - left) as f64 / (right - left) as f64;
            let (lat_left, lon_left) = coords[&stops[left]];
            let (lat_right, lon_right) = coords[&stops[right]];
            coords.insert(stop.clone(), (
                lat_left + (lat_right - lat_left) * fraction,
                lon_left + (lon_right - lon_left) * fraction,
            ));
        }
    }

    for point in points.iter_mut() {
        let (lat, lon) = coords[&point.name];
        point.lat = lat;
        point.lon = lon;
    }
}

/// Integer rank per stop in sorted axis order: one more than the highest
/// rank among earlier neighbors, zero when none precede.
fn compression_ranks(points: &[PlotStop], adjacency: &Adjacency) -> Vec<usize> {
    let mut ranks = vec![0usize; points.len()];
    for i in 0..points.len() {
        let neighbors = adjacency.get(&points[i].name);
        let mut rank = 0;
        for j in 0..i {
            let adjacent = neighbors.map_or(false, |set| set.contains(&points[j].name));
            if adjacent {
                rank = rank.max(ranks[j] + 1);
            }
        }
        ranks[i] = rank;
    }
    ranks
}

fn axis_step(extent: f64, padding: f64, ranks: &[usize]) -> f64 {
    let max_rank = ranks.iter().copied().max().unwrap_or(0).max(1);
    (extent - 2.0 * padding) / max_rank as f64
}
