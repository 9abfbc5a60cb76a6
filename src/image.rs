//! The parsed photoplotter image, as handed over by a parser.
//!
//! Everything here is read-only to the renderer. Layers and net states live in arenas owned by the
//! [`Image`]; nets refer to them by index so the renderer can detect a change by comparing ids.

use std::collections::HashMap;

use crate::geometry::BoundingBox;
use crate::types::{ImagePolarity, Polarity};
use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetStateId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    LinearX1,
    LinearX10,
    LinearX01,
    LinearX001,
    ClockwiseCircular,
    CounterclockwiseCircular,
    RegionStart,
    RegionEnd,
    Deleted,
}

impl Interpolation {
    pub fn is_linear(&self) -> bool {
        matches!(
            self,
            Interpolation::LinearX1 | Interpolation::LinearX10 | Interpolation::LinearX01 | Interpolation::LinearX001
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApertureState {
    Off,
    On,
    Flash,
}

/// Circular interpolation data.
///
/// `angle1` and `angle2` are in degrees, measured from +X in the direction of travel: counter-clockwise
/// for counter-clockwise segments, clockwise for clockwise segments.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleSegment {
    pub center: Position,
    pub width: f64,
    pub height: f64,
    pub angle1: f64,
    pub angle2: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Net {
    pub start: Position,
    pub stop: Position,
    pub interpolation: Interpolation,
    pub aperture: u32,
    pub aperture_state: ApertureState,
    pub circle_segment: Option<CircleSegment>,
    pub layer: LayerId,
    pub state: NetStateId,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Knockout {
    /// Only the first net of the layer that owns the knockout carries this flag.
    pub first_instance: bool,
    pub polarity: Polarity,
    pub lower_left: Position,
    pub width: f64,
    pub height: f64,
    pub border: f64,
}

impl Knockout {
    /// The knockout rectangle, grown by the border on every side.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min: Position::new(self.lower_left.x - self.border, self.lower_left.y - self.border),
            max: Position::new(
                self.lower_left.x + self.width + self.border,
                self.lower_left.y + self.height + self.border,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepAndRepeat {
    pub x: u32,
    pub y: u32,
    pub distance_x: f64,
    pub distance_y: f64,
}

impl Default for StepAndRepeat {
    fn default() -> Self {
        Self {
            x: 1,
            y: 1,
            distance_x: 0.0,
            distance_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    /// Degrees, counter-clockwise.
    pub rotation: f64,
    pub polarity: Polarity,
    pub knockout: Option<Knockout>,
    pub step_and_repeat: StepAndRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MirrorState {
    #[default]
    None,
    FlipA,
    FlipB,
    FlipAB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisSelect {
    #[default]
    None,
    SwapAB,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetState {
    pub scale_a: f64,
    pub scale_b: f64,
    pub offset_a: f64,
    pub offset_b: f64,
    pub mirror: MirrorState,
    pub axis_select: AxisSelect,
}

impl Default for NetState {
    fn default() -> Self {
        Self {
            scale_a: 1.0,
            scale_b: 1.0,
            offset_a: 0.0,
            offset_b: 0.0,
            mirror: MirrorState::None,
            axis_select: AxisSelect::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApertureType {
    Circle,
    Rectangle,
    Oval,
    Polygon,
    Macro,
    /// An aperture type code the renderer has no drawing for.
    Unknown(u32),
}

/// Primitive codes as used by aperture macros, `Line20`..`Line22` being the vector, center and
/// lower-left line primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MacroPrimitiveKind {
    Circle,
    Outline,
    Polygon,
    Moire,
    Thermal,
    Line20,
    Line21,
    Line22,
    Unknown(u32),
}

impl From<u32> for MacroPrimitiveKind {
    fn from(code: u32) -> Self {
        match code {
            1 => MacroPrimitiveKind::Circle,
            4 => MacroPrimitiveKind::Outline,
            5 => MacroPrimitiveKind::Polygon,
            6 => MacroPrimitiveKind::Moire,
            7 => MacroPrimitiveKind::Thermal,
            2 | 20 => MacroPrimitiveKind::Line20,
            21 => MacroPrimitiveKind::Line21,
            22 => MacroPrimitiveKind::Line22,
            other => MacroPrimitiveKind::Unknown(other),
        }
    }
}

/// One macro primitive with its variables already substituted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacroPrimitive {
    pub kind: MacroPrimitiveKind,
    pub parameters: Vec<f64>,
}

impl MacroPrimitive {
    pub fn new(kind: impl Into<MacroPrimitiveKind>, parameters: Vec<f64>) -> Self {
        Self {
            kind: kind.into(),
            parameters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplifiedMacro {
    pub primitives: Vec<MacroPrimitive>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aperture {
    pub aperture_type: ApertureType,
    pub parameters: Vec<f64>,
    pub simplified: Option<SimplifiedMacro>,
}

impl Aperture {
    pub fn new(aperture_type: ApertureType, parameters: Vec<f64>) -> Self {
        Self {
            aperture_type,
            parameters,
            simplified: None,
        }
    }

    pub fn circle(diameter: f64) -> Self {
        Self::new(ApertureType::Circle, vec![diameter])
    }

    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(ApertureType::Rectangle, vec![width, height])
    }

    pub fn oval(width: f64, height: f64) -> Self {
        Self::new(ApertureType::Oval, vec![width, height])
    }

    pub fn polygon(diameter: f64, vertices: u32, rotation: f64) -> Self {
        Self::new(ApertureType::Polygon, vec![diameter, vertices as f64, rotation])
    }

    pub fn with_hole(mut self, hole_diameter: f64) -> Self {
        let hole_index = match self.aperture_type {
            ApertureType::Circle => 1,
            ApertureType::Rectangle | ApertureType::Oval => 2,
            ApertureType::Polygon => 3,
            _ => return self,
        };
        if self.parameters.len() <= hole_index {
            self.parameters.resize(hole_index + 1, 0.0);
        }
        self.parameters[hole_index] = hole_diameter;
        self
    }

    pub fn macro_aperture(primitives: Vec<MacroPrimitive>) -> Self {
        Self {
            aperture_type: ApertureType::Macro,
            parameters: vec![],
            simplified: Some(SimplifiedMacro {
                primitives,
            }),
        }
    }

    /// Missing trailing parameters read as zero.
    pub fn parameter(&self, index: usize) -> f64 {
        self.parameters
            .get(index)
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageInfo {
    pub min: Position,
    pub max: Position,
    pub polarity: ImagePolarity,
    pub image_justify_offset_a: f64,
    pub image_justify_offset_b: f64,
    pub offset_a: f64,
    pub offset_b: f64,
    /// Degrees, counter-clockwise.
    pub image_rotation: f64,
}

impl Default for ImageInfo {
    fn default() -> Self {
        Self {
            min: Position::new(0.0, 0.0),
            max: Position::new(0.0, 0.0),
            polarity: ImagePolarity::Positive,
            image_justify_offset_a: 0.0,
            image_justify_offset_b: 0.0,
            offset_a: 0.0,
            offset_b: 0.0,
            image_rotation: 0.0,
        }
    }
}

impl ImageInfo {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min: self.min,
            max: self.max,
        }
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Image {
    pub info: ImageInfo,
    pub apertures: HashMap<u32, Aperture>,
    pub layers: Vec<Layer>,
    pub states: Vec<NetState>,
    pub nets: Vec<Net>,
}

impl Image {
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    pub fn state(&self, id: NetStateId) -> Option<&NetState> {
        self.states.get(id.0)
    }

    pub fn aperture(&self, index: u32) -> Option<&Aperture> {
        self.apertures.get(&index)
    }

    /// Iterates the nets that are drawn on their own, yielding each net with its index.
    ///
    /// A `RegionStart` net stands for its whole region, so the nets after it up to and including the
    /// matching `RegionEnd` are skipped.
    pub fn renderable_nets(&self) -> RenderableNets<'_> {
        RenderableNets {
            nets: &self.nets,
            index: 0,
        }
    }
}

pub struct RenderableNets<'a> {
    nets: &'a [Net],
    index: usize,
}

impl<'a> Iterator for RenderableNets<'a> {
    type Item = (usize, &'a Net);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        let net = self.nets.get(index)?;

        self.index = match net.interpolation {
            Interpolation::RegionStart => self.nets[index + 1..]
                .iter()
                .position(|candidate| candidate.interpolation == Interpolation::RegionEnd)
                .map(|offset| index + 1 + offset + 1)
                .unwrap_or(self.nets.len()),
            _ => index + 1,
        };

        Some((index, net))
    }
}

/// Projection from Gerber units to device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderInfo {
    pub scale_factor_x: f64,
    pub scale_factor_y: f64,
    pub lower_left_x: f64,
    pub lower_left_y: f64,
    pub display_width: u32,
    pub display_height: u32,
}

/// Caller-supplied transform applied on top of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees, counter-clockwise.
    pub rotation: f64,
    pub mirror_around_x: bool,
    pub mirror_around_y: bool,
    pub inverted: bool,
}

impl Default for UserTransform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            mirror_around_x: false,
            mirror_around_y: false,
            inverted: false,
        }
    }
}
