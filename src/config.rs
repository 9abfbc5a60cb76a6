use crate::types::Color;

/// How dark and clear exposures reach the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawingMode {
    /// Dark paints the foreground color over the surface, clear erases to transparent.
    /// Needs a surface with per-pixel alpha.
    #[default]
    CompositingModes,
    /// Dark paints the foreground color, clear paints the background color.
    TwoColors,
}

/// How the primitives of an aperture macro are combined before they reach the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MacroStrategy {
    /// Paint each primitive into an offscreen layer, then composite the layer.
    OffscreenBuffer,
    /// Union and subtract the primitives into one path, then fill it once.
    #[default]
    PathAlgebra,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderConfiguration {
    pub drawing_mode: DrawingMode,
    pub foreground: Color,
    pub background: Color,
    /// Paints the background before the first net.
    pub fill_before_draw: bool,
    /// When filling the background, fill the whole device instead of just the image bounding box.
    pub fill_full_device: bool,
    pub macro_strategy: MacroStrategy,
    /// Number of points used for the N-gon of a macro circle.
    pub circle_precision: u32,
    /// Maximum distance between an arc and its flattened polyline, in image units.
    pub arc_tolerance: f64,
}

impl Default for RenderConfiguration {
    fn default() -> Self {
        Self {
            drawing_mode: DrawingMode::default(),
            foreground: Color::BLACK,
            background: Color::WHITE,
            fill_before_draw: false,
            fill_full_device: true,
            macro_strategy: MacroStrategy::default(),
            circle_precision: 100,
            arc_tolerance: 0.001,
        }
    }
}
