use serde::Deserialize;

use crate::svg::Color;

/// One drawing layer of the map; the input's `layers` array picks which
/// layers are painted and in what z-order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapLayer {
    BusLines,
    BusLabels,
    StopPoints,
    StopLabels,
}

/// Visual parameters of the rendered map, taken verbatim from the input
/// document.
#[derive(Clone, Debug, Deserialize)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub stop_radius: f64,
    pub line_width: f64,
    pub outer_margin: f64,
    pub stop_label_font_size: u32,
    pub stop_label_offset: [f64; 2],
    pub bus_label_font_size: u32,
    pub bus_label_offset: [f64; 2],
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
    pub layers: Vec<MapLayer>,
}

impl RenderSettings {
    /// Palette color of the bus with the given ordinal, cycling through the
    /// palette.
    pub fn palette_color(&self, ordinal: usize) -> Color {
        if self.color_palette.is_empty() {
            return Color::None;
        }
        self.color_palette[ordinal % self.color_palette.len()].clone()
    }
}
