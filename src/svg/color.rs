use std::fmt;

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// An opaque RGB color with 0-255 channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// An RGB color with an alpha channel in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

/// A paint value as it appears in an SVG attribute.
///
/// `None` renders as the literal `none`, which is also the default fill and
/// stroke of every figure.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Color {
    #[default]
    None,
    Named(String),
    Rgb(Rgb),
    Rgba(Rgba),
}

impl Color {
    pub fn named(name: impl Into<String>) -> Color {
        Color::Named(name.into())
    }

    pub fn rgb(red: u8, green: u8, blue: u8) -> Color {
        Color::Rgb(Rgb { red, green, blue })
    }

    pub fn rgba(red: u8, green: u8, blue: u8, alpha: f64) -> Color {
        Color::Rgba(Rgba {
            red,
            green,
            blue,
            alpha,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => f.write_str("none"),
            Color::Named(name) => f.write_str(name),
            Color::Rgb(c) => write!(f, "rgb({},{},{})", c.red, c.green, c.blue),
            Color::Rgba(c) => write!(f, "rgba({},{},{},{})", c.red, c.green, c.blue, c.alpha),
        }
    }
}

impl From<&str> for Color {
    fn from(name: &str) -> Color {
        Color::Named(name.to_string())
    }
}

/// Accepts either a CSS color string, an `[r, g, b]` array, or an
/// `[r, g, b, a]` array with integer channels and a real alpha.
impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Channels(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Name(name) => Ok(Color::Named(name)),
            Repr::Channels(ch) => match ch.as_slice() {
                [r, g, b] => Ok(Color::rgb(*r as u8, *g as u8, *b as u8)),
                [r, g, b, a] => Ok(Color::rgba(*r as u8, *g as u8, *b as u8, *a)),
                other => Err(de::Error::invalid_length(
                    other.len(),
                    &"3 or 4 color channels",
                )),
            },
        }
    }
}
