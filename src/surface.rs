//! The painting capabilities the renderer needs from an output surface.

use crate::geometry::{Affine, ShapePath};
use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    #[default]
    SourceOver,
    /// Erase whatever the painted shape covers.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Round,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    /// In path units, scaled by the current transform.
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Pen {
    pub fn round(width: f64) -> Self {
        Self {
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }

    pub fn flat(width: f64) -> Self {
        Self {
            width,
            cap: LineCap::Flat,
            join: LineJoin::Round,
        }
    }
}

/// A 2D painting surface.
///
/// Paths are given in user coordinates and mapped to the device by the current transform. Fills use the
/// even-odd rule.
pub trait Surface {
    fn set_transform(&mut self, transform: &Affine);
    fn transform(&self) -> Affine;

    fn set_composite_mode(&mut self, mode: CompositeMode);
    fn composite_mode(&self) -> CompositeMode;

    fn fill_path(&mut self, path: &ShapePath, color: Color);
    fn stroke_path(&mut self, path: &ShapePath, pen: &Pen, color: Color);

    /// Saves the transform and composite mode.
    fn save(&mut self);
    /// Restores the most recently saved transform and composite mode.
    fn restore(&mut self);

    /// Starts a transparent offscreen layer that receives all painting until [`Surface::end_layer`].
    fn begin_layer(&mut self);
    /// Composites the current offscreen layer onto the one below with `mode`.
    fn end_layer(&mut self, mode: CompositeMode);
}
