//! Display colors and opacity for chains

mod mapper;
mod palette;

pub use mapper::{ColorConfig, ColorMapper, ColorMode, HighlightState};
pub use palette::{CategoricalPalette, ContinuousPalette, Rgb, FALLBACK_GRAY};
