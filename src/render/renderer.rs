use std::collections::BTreeMap;

use petgraph::graph::EdgeIndex;

use crate::routing::{RideEdge, RideGraph};
use crate::svg::{Circle, Color, Document, Point, Polyline, Rect, Text};
use crate::transit::{BusRecord, TransitCatalog};

use super::layout::MapLayout;
use super::settings::{MapLayer, RenderSettings};

fn offset_point(offset: [f64; 2]) -> Point {
    Point::new(offset[0], offset[1])
}

/// Draws the network map and per-route overlays as SVG documents.
///
/// The layout is computed once when the renderer is created; every rendered
/// document is a pure function of the frozen catalog and the settings, so
/// repeated queries produce identical markup.
pub struct MapRenderer<'a> {
    catalog: &'a TransitCatalog,
    settings: &'a RenderSettings,
    layout: MapLayout,
}

impl<'a> MapRenderer<'a> {
    pub fn new(catalog: &'a TransitCatalog, settings: &'a RenderSettings) -> MapRenderer<'a> {
        let layout = MapLayout::compute(catalog, settings);
        MapRenderer {
            catalog,
            settings,
            layout,
        }
    }

    /// The full network map, layer by layer in configured order.
    pub fn render_map(&self) -> String {
        let mut doc = Document::new();
        self.add_map_layers(&mut doc);
        doc.render_to_string()
    }

    /// The full map dimmed behind an opaque backdrop, with only the figures
    /// belonging to the given route drawn on top.
    pub fn render_route(&self, rides: &RideGraph, route: &[EdgeIndex]) -> String {
        let mut doc = Document::new();
        self.add_map_layers(&mut doc);
        self.add_backdrop(&mut doc);
        for layer in &self.settings.layers {
            match layer {
                MapLayer::BusLines => self.add_route_lines(&mut doc, rides, route),
                MapLayer::BusLabels => self.add_route_bus_labels(&mut doc, rides, route),
                MapLayer::StopPoints => self.add_route_stop_points(&mut doc, rides, route),
                MapLayer::StopLabels => self.add_route_stop_labels(&mut doc, rides, route),
            }
        }
        doc.render_to_string()
    }

    fn add_map_layers(&self, doc: &mut Document) {
        for layer in &self.settings.layers {
            match layer {
                MapLayer::BusLines => self.add_bus_lines(doc),
                MapLayer::BusLabels => self.add_bus_labels(doc),
                MapLayer::StopPoints => self.add_stop_points(doc),
                MapLayer::StopLabels => self.add_stop_labels(doc),
            }
        }
    }

    fn add_bus_lines(&self, doc: &mut Document) {
        for (ordinal, bus) in self.catalog.buses().values().enumerate() {
            let mut line = self.line_template(ordinal);
            for stop in &bus.stops {
                line = line.point(self.layout.position(stop));
            }
            doc.add(line);
        }
    }

    fn add_bus_labels(&self, doc: &mut Document) {
        for (ordinal, (name, bus)) in self.catalog.buses().iter().enumerate() {
            for stop in bus_label_stops(bus) {
                let (underlayer, main) =
                    self.bus_label_pair(name, ordinal, self.layout.position(stop));
                doc.add(underlayer);
                doc.add(main);
            }
        }
    }

    fn add_stop_points(&self, doc: &mut Document) {
        for name in self.catalog.stops().keys() {
            doc.add(self.stop_circle(name));
        }
    }

    fn add_stop_labels(&self, doc: &mut Document) {
        for name in self.catalog.stops().keys() {
            let (underlayer, main) = self.stop_label_pair(name);
            doc.add(underlayer);
            doc.add(main);
        }
    }

    fn add_backdrop(&self, doc: &mut Document) {
        let margin = self.settings.outer_margin;
        doc.add(
            Rect::new()
                .position(Point::new(-margin, -margin))
                .size(
                    self.settings.width + 2.0 * margin,
                    self.settings.height + 2.0 * margin,
                )
                .fill(self.settings.underlayer_color.clone()),
        );
    }

    fn add_route_lines(&self, doc: &mut Document, rides: &RideGraph, route: &[EdgeIndex]) {
        for edge_index in route {
            let ride = rides.edge(*edge_index);
            let bus = self.route_bus(ride);
            let mut line = self.line_template(self.bus_ordinal(&ride.bus));
            for stop in traversed_stops(bus, ride) {
                line = line.point(self.layout.position(stop));
            }
            doc.add(line);
        }
    }

    fn add_route_bus_labels(&self, doc: &mut Document, rides: &RideGraph, route: &[EdgeIndex]) {
        let mut labels: BTreeMap<(String, String), (Text, Text)> = BTreeMap::new();
        for (ordinal, (name, bus)) in self.catalog.buses().iter().enumerate() {
            for stop in bus_label_stops(bus) {
                labels.insert(
                    (name.clone(), stop.clone()),
                    self.bus_label_pair(name, ordinal, self.layout.position(stop)),
                );
            }
        }

        for edge_index in route {
            let ride = rides.edge(*edge_index);
            for stop in [&ride.from, &ride.to] {
                if let Some((underlayer, main)) = labels.get(&(ride.bus.clone(), stop.clone())) {
                    doc.add(underlayer.clone());
                    doc.add(main.clone());
                }
            }
        }
    }

    fn add_route_stop_points(&self, doc: &mut Document, rides: &RideGraph, route: &[EdgeIndex]) {
        for edge_index in route {
            let ride = rides.edge(*edge_index);
            for stop in traversed_stops(self.route_bus(ride), ride) {
                doc.add(self.stop_circle(stop));
            }
        }
    }

    fn add_route_stop_labels(&self, doc: &mut Document, rides: &RideGraph, route: &[EdgeIndex]) {
        let mut visited = Vec::new();
        for (position, edge_index) in route.iter().enumerate() {
            let ride = rides.edge(*edge_index);
            if position == 0 {
                visited.push(ride.from.as_str());
            }
            visited.push(ride.to.as_str());
        }
        for stop in visited {
            let (underlayer, main) = self.stop_label_pair(stop);
            doc.add(underlayer);
            doc.add(main);
        }
    }

    fn line_template(&self, ordinal: usize) -> Polyline {
        Polyline::new()
            .stroke(self.settings.palette_color(ordinal))
            .stroke_width(self.settings.line_width)
            .stroke_line_cap("round")
            .stroke_line_join("round")
    }

    fn stop_circle(&self, stop: &str) -> Circle {
        Circle::new()
            .center(self.layout.position(stop))
            .radius(self.settings.stop_radius)
            .fill(Color::named("white"))
    }

    fn bus_label_pair(&self, name: &str, ordinal: usize, at: Point) -> (Text, Text) {
        let base = Text::new()
            .position(at)
            .offset(offset_point(self.settings.bus_label_offset))
            .font_size(self.settings.bus_label_font_size)
            .font_family("Verdana")
            .font_weight("bold")
            .data(name);
        let underlayer = base
            .clone()
            .fill(self.settings.underlayer_color.clone())
            .stroke(self.settings.underlayer_color.clone())
            .stroke_width(self.settings.underlayer_width)
            .stroke_line_cap("round")
            .stroke_line_join("round");
        let main = base.fill(self.settings.palette_color(ordinal));
        (underlayer, main)
    }

    fn stop_label_pair(&self, stop: &str) -> (Text, Text) {
        let base = Text::new()
            .position(self.layout.position(stop))
            .offset(offset_point(self.settings.stop_label_offset))
            .font_size(self.settings.stop_label_font_size)
            .font_family("Verdana")
            .data(stop);
        let underlayer = base
            .clone()
            .fill(self.settings.underlayer_color.clone())
            .stroke(self.settings.underlayer_color.clone())
            .stroke_width(self.settings.underlayer_width)
            .stroke_line_cap("round")
            .stroke_line_join("round");
        let main = base.fill(Color::named("black"));
        (underlayer, main)
    }

    fn bus_ordinal(&self, name: &str) -> usize {
        self.catalog
            .buses()
            .keys()
            .position(|bus| bus == name)
            .expect("route edges reference catalog buses")
    }

    fn route_bus(&self, ride: &RideEdge) -> &BusRecord {
        self.catalog
            .bus(&ride.bus)
            .expect("route edges reference catalog buses")
    }
}

/// Stops where a bus carries its name label: the first stored stop, and for
/// out-and-back lines the turnaround when it differs.
fn bus_label_stops(bus: &BusRecord) -> Vec<&String> {
    let mut at = vec![&bus.stops[0]];
    if !bus.is_round_trip {
        let turnaround = &bus.stops[bus.turnaround_index()];
        if turnaround != &bus.stops[0] {
            at.push(turnaround);
        }
    }
    at
}

/// The contiguous stored-sequence slice a ride traverses, reversed when the
/// ride matches the sequence in the opposite direction.
fn traversed_stops<'b>(bus: &'b BusRecord, ride: &RideEdge) -> Vec<&'b String> {
    let stops = &bus.stops;
    for i in 0..stops.len() {
        if i + ride.span >= stops.len() {
            continue;
        }
        if stops[i] == ride.from && stops[i + ride.span] == ride.to {
            return stops[i..=i + ride.span].iter().collect();
        }
        if stops[i] == ride.to && stops[i + ride.span] == ride.from {
            return stops[i..=i + ride.span].iter().rev().collect();
        }
    }
    debug_assert!(false, "ride {:?} has no match on bus {}", ride, ride.bus);
    Vec::new()
}
