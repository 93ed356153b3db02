//! Map projection and SVG rendering of the network.

pub mod layout;
pub mod renderer;
pub mod settings;

pub use layout::MapLayout;
pub use renderer::MapRenderer;
pub use settings::{MapLayer, RenderSettings};
