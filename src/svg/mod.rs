//! Minimal SVG document model used by the map renderer.
//!
//! Figures are built with chained setters and sealed into a [`Document`],
//! which serializes the whole drawing as a single line of SVG markup. All
//! floating-point attributes render with a fixed 12-decimal precision so the
//! output is byte-stable across runs.

pub mod color;

pub use color::{Color, Rgb, Rgba};

use std::fmt::{self, Write};

/// A position on the rendered canvas, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

fn float_attr<W: Write>(out: &mut W, key: &str, value: f64) -> fmt::Result {
    write!(out, "{}=\"{:.12}\" ", key, value)
}

fn plain_attr<W: Write>(out: &mut W, key: &str, value: &dyn fmt::Display) -> fmt::Result {
    write!(out, "{}=\"{}\" ", key, value)
}

/// Paint attributes shared by every figure kind.
#[derive(Clone, Debug)]
struct Style {
    fill: Color,
    stroke: Color,
    stroke_width: f64,
    stroke_line_cap: Option<String>,
    stroke_line_join: Option<String>,
}

impl Default for Style {
    fn default() -> Style {
        Style {
            fill: Color::None,
            stroke: Color::None,
            stroke_width: 1.0,
            stroke_line_cap: None,
            stroke_line_join: None,
        }
    }
}

impl Style {
    fn render<W: Write>(&self, out: &mut W) -> fmt::Result {
        plain_attr(out, "fill", &self.fill)?;
        plain_attr(out, "stroke", &self.stroke)?;
        float_attr(out, "stroke-width", self.stroke_width)?;
        if let Some(cap) = &self.stroke_line_cap {
            plain_attr(out, "stroke-linecap", cap)?;
        }
        if let Some(join) = &self.stroke_line_join {
            plain_attr(out, "stroke-linejoin", join)?;
        }
        Ok(())
    }
}

macro_rules! style_setters {
    ($figure:ty) => {
        impl $figure {
            pub fn fill(mut self, color: Color) -> Self {
                self.style.fill = color;
                self
            }

            pub fn stroke(mut self, color: Color) -> Self {
                self.style.stroke = color;
                self
            }

            pub fn stroke_width(mut self, width: f64) -> Self {
                self.style.stroke_width = width;
                self
            }

            pub fn stroke_line_cap(mut self, cap: &str) -> Self {
                self.style.stroke_line_cap = Some(cap.to_string());
                self
            }

            pub fn stroke_line_join(mut self, join: &str) -> Self {
                self.style.stroke_line_join = Some(join.to_string());
                self
            }
        }
    };
}

/// A filled or stroked circle.
#[derive(Clone, Debug, Default)]
pub struct Circle {
    style: Style,
    center: Point,
    radius: f64,
}

impl Circle {
    pub fn new() -> Circle {
        Circle {
            radius: 1.0,
            ..Circle::default()
        }
    }

    pub fn center(mut self, center: Point) -> Circle {
        self.center = center;
        self
    }

    pub fn radius(mut self, radius: f64) -> Circle {
        self.radius = radius;
        self
    }

    fn render<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("<circle ")?;
        self.style.render(out)?;
        float_attr(out, "cx", self.center.x)?;
        float_attr(out, "cy", self.center.y)?;
        float_attr(out, "r", self.radius)?;
        out.write_str("/>")
    }
}

style_setters!(Circle);

/// An open polyline through an ordered list of points.
#[derive(Clone, Debug, Default)]
pub struct Polyline {
    style: Style,
    points: Vec<Point>,
}

impl Polyline {
    pub fn new() -> Polyline {
        Polyline::default()
    }

    pub fn point(mut self, point: Point) -> Polyline {
        self.points.push(point);
        self
    }

    fn render<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("<polyline ")?;
        self.style.render(out)?;
        out.write_str("points=\"")?;
        for p in &self.points {
            write!(out, "{:.12},{:.12} ", p.x, p.y)?;
        }
        out.write_str("\" ")?;
        out.write_str("/>")
    }
}

style_setters!(Polyline);

/// A text label anchored at a point with a pixel offset.
#[derive(Clone, Debug)]
pub struct Text {
    style: Style,
    position: Point,
    offset: Point,
    font_size: u32,
    font_family: Option<String>,
    font_weight: Option<String>,
    data: String,
}

impl Default for Text {
    fn default() -> Text {
        Text {
            style: Style::default(),
            position: Point::default(),
            offset: Point::default(),
            font_size: 1,
            font_family: None,
            font_weight: None,
            data: String::new(),
        }
    }
}

impl Text {
    pub fn new() -> Text {
        Text::default()
    }

    pub fn position(mut self, position: Point) -> Text {
        self.position = position;
        self
    }

    pub fn offset(mut self, offset: Point) -> Text {
        self.offset = offset;
        self
    }

    pub fn font_size(mut self, size: u32) -> Text {
        self.font_size = size;
        self
    }

    pub fn font_family(mut self, family: &str) -> Text {
        self.font_family = Some(family.to_string());
        self
    }

    pub fn font_weight(mut self, weight: &str) -> Text {
        self.font_weight = Some(weight.to_string());
        self
    }

    pub fn data(mut self, data: impl Into<String>) -> Text {
        self.data = data.into();
        self
    }

    fn render<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("<text ")?;
        self.style.render(out)?;
        float_attr(out, "x", self.position.x)?;
        float_attr(out, "y", self.position.y)?;
        float_attr(out, "dx", self.offset.x)?;
        float_attr(out, "dy", self.offset.y)?;
        plain_attr(out, "font-size", &self.font_size)?;
        if let Some(family) = &self.font_family {
            plain_attr(out, "font-family", family)?;
        }
        if let Some(weight) = &self.font_weight {
            plain_attr(out, "font-weight", weight)?;
        }
        write!(out, ">{}</text>", self.data)
    }
}

style_setters!(Text);

/// An axis-aligned rectangle, used for the route overlay backdrop.
#[derive(Clone, Debug, Default)]
pub struct Rect {
    style: Style,
    position: Point,
    width: f64,
    height: f64,
}

impl Rect {
    pub fn new() -> Rect {
        Rect::default()
    }

    pub fn position(mut self, position: Point) -> Rect {
        self.position = position;
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Rect {
        self.width = width;
        self.height = height;
        self
    }

    fn render<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("<rect ")?;
        self.style.render(out)?;
        float_attr(out, "x", self.position.x)?;
        float_attr(out, "y", self.position.y)?;
        float_attr(out, "width", self.width)?;
        float_attr(out, "height", self.height)?;
        out.write_str("/>")
    }
}

style_setters!(Rect);

/// Any figure a document can hold.
#[derive(Clone, Debug)]
pub enum Figure {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
    Rect(Rect),
}

impl From<Circle> for Figure {
    fn from(figure: Circle) -> Figure {
        Figure::Circle(figure)
    }
}

impl From<Polyline> for Figure {
    fn from(figure: Polyline) -> Figure {
        Figure::Polyline(figure)
    }
}

impl From<Text> for Figure {
    fn from(figure: Text) -> Figure {
        Figure::Text(figure)
    }
}

impl From<Rect> for Figure {
    fn from(figure: Rect) -> Figure {
        Figure::Rect(figure)
    }
}

/// An ordered collection of figures; later figures paint over earlier ones.
#[derive(Clone, Debug, Default)]
pub struct Document {
    figures: Vec<Figure>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    pub fn add(&mut self, figure: impl Into<Figure>) {
        self.figures.push(figure.into());
    }

    pub fn render<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>")?;
        out.write_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">")?;
        for figure in &self.figures {
            match figure {
                Figure::Circle(f) => f.render(out)?,
                Figure::Polyline(f) => f.render(out)?,
                Figure::Text(f) => f.render(out)?,
                Figure::Rect(f) => f.render(out)?,
            }
        }
        out.write_str("</svg>")
    }

    pub fn render_to_string(&self) -> String {
        let mut out = String::new();
        self.render(&mut out)
            .expect("formatting into a String cannot fail");
        out
    }
}
