//! Test helpers: a surface that records what it is asked to paint, and builders for small images.

use crate::geometry::{Affine, BoundingBox, ShapePath};
use crate::image::{
    Aperture, ApertureState, CircleSegment, Image, ImageInfo, Interpolation, Layer, LayerId, MacroPrimitive, Net,
    NetState, NetStateId,
};
use crate::surface::{CompositeMode, Pen, Surface};
use crate::types::{Color, Winding};
use crate::Position;

/// Flattening tolerance used when mapping recorded paths to the device, in path units.
pub const RECORDING_TOLERANCE: f64 = 0.0001;

/// A path handed to the surface together with the painter state at the time.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedPath {
    pub path: ShapePath,
    pub transform: Affine,
    pub color: Color,
    pub mode: CompositeMode,
    /// Number of offscreen layers open when the path was painted.
    pub layer_depth: usize,
}

impl PaintedPath {
    pub fn device_path(&self) -> ShapePath {
        self.path
            .transformed(&self.transform, RECORDING_TOLERANCE)
    }

    pub fn device_bounds(&self) -> BoundingBox {
        self.device_path()
            .bounding_box(RECORDING_TOLERANCE)
    }

    pub fn contains_device(&self, position: Position) -> bool {
        self.device_path()
            .contains(position, RECORDING_TOLERANCE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Fill(PaintedPath),
    Stroke(PaintedPath, Pen),
    BeginLayer,
    EndLayer(CompositeMode),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    transform: Affine,
    mode: CompositeMode,
    saved: Vec<(Affine, CompositeMode)>,
    layer_depth: usize,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn fills(&self) -> Vec<&PaintedPath> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Fill(painted) => Some(painted),
                _ => None,
            })
            .collect()
    }

    pub fn strokes(&self) -> Vec<(&PaintedPath, &Pen)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Stroke(painted, pen) => Some((painted, pen)),
                _ => None,
            })
            .collect()
    }

    fn painted(&self, path: &ShapePath, color: Color) -> PaintedPath {
        PaintedPath {
            path: path.clone(),
            transform: self.transform,
            color,
            mode: self.mode,
            layer_depth: self.layer_depth,
        }
    }
}

impl Surface for RecordingSurface {
    fn set_transform(&mut self, transform: &Affine) {
        self.transform = *transform;
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.mode = mode;
    }

    fn composite_mode(&self) -> CompositeMode {
        self.mode
    }

    fn fill_path(&mut self, path: &ShapePath, color: Color) {
        let painted = self.painted(path, color);
        self.calls.push(SurfaceCall::Fill(painted));
    }

    fn stroke_path(&mut self, path: &ShapePath, pen: &Pen, color: Color) {
        let painted = self.painted(path, color);
        self.calls
            .push(SurfaceCall::Stroke(painted, *pen));
    }

    fn save(&mut self) {
        self.saved
            .push((self.transform, self.mode));
    }

    fn restore(&mut self) {
        if let Some((transform, mode)) = self.saved.pop() {
            self.transform = transform;
            self.mode = mode;
        }
    }

    fn begin_layer(&mut self) {
        self.layer_depth += 1;
        self.calls.push(SurfaceCall::BeginLayer);
    }

    fn end_layer(&mut self, mode: CompositeMode) {
        self.layer_depth = self.layer_depth.saturating_sub(1);
        self.calls.push(SurfaceCall::EndLayer(mode));
    }
}

/// Builds small images net by net. Nets use the most recently added layer and net state.
pub struct ImageBuilder {
    image: Image,
    layer: LayerId,
    state: NetStateId,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBuilder {
    /// Starts with one default layer and one default net state.
    pub fn new() -> Self {
        Self {
            image: Image {
                layers: vec![Layer::default()],
                states: vec![NetState::default()],
                ..Image::default()
            },
            layer: LayerId(0),
            state: NetStateId(0),
        }
    }

    pub fn info(mut self, info: ImageInfo) -> Self {
        self.image.info = info;
        self
    }

    pub fn aperture(mut self, index: u32, aperture: Aperture) -> Self {
        self.image
            .apertures
            .insert(index, aperture);
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.image.layers.push(layer);
        self.layer = LayerId(self.image.layers.len() - 1);
        self
    }

    pub fn state(mut self, state: NetState) -> Self {
        self.image.states.push(state);
        self.state = NetStateId(self.image.states.len() - 1);
        self
    }

    /// Adds a net as given, its layer and state are not changed.
    pub fn net(mut self, net: Net) -> Self {
        self.image.nets.push(net);
        self
    }

    fn push(
        self,
        aperture: u32,
        aperture_state: ApertureState,
        interpolation: Interpolation,
        start: (f64, f64),
        stop: (f64, f64),
    ) -> Self {
        let net = Net {
            start: Position::new(start.0, start.1),
            stop: Position::new(stop.0, stop.1),
            interpolation,
            aperture,
            aperture_state,
            circle_segment: None,
            layer: self.layer,
            state: self.state,
        };
        self.net(net)
    }

    pub fn flash(self, aperture: u32, at: (f64, f64)) -> Self {
        self.push(aperture, ApertureState::Flash, Interpolation::LinearX1, at, at)
    }

    pub fn line(self, aperture: u32, from: (f64, f64), to: (f64, f64)) -> Self {
        self.push(aperture, ApertureState::On, Interpolation::LinearX1, from, to)
    }

    pub fn arc(
        mut self,
        aperture: u32,
        from: (f64, f64),
        to: (f64, f64),
        segment: CircleSegment,
        direction: Winding,
    ) -> Self {
        let interpolation = match direction {
            Winding::Clockwise => Interpolation::ClockwiseCircular,
            Winding::CounterClockwise => Interpolation::CounterclockwiseCircular,
        };
        self = self.push(aperture, ApertureState::On, interpolation, from, to);
        if let Some(net) = self.image.nets.last_mut() {
            net.circle_segment = Some(segment);
        }
        self
    }

    /// A region outlined by straight edges through `points`, closed back to the first point.
    pub fn region(mut self, points: &[(f64, f64)]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        self = self.push(0, ApertureState::On, Interpolation::RegionStart, *first, *first);
        self = self.push(0, ApertureState::Off, Interpolation::LinearX1, *first, *first);
        let mut previous = *first;
        for point in rest.iter().chain(std::iter::once(first)) {
            self = self.push(0, ApertureState::On, Interpolation::LinearX1, previous, *point);
            previous = *point;
        }
        self.push(0, ApertureState::On, Interpolation::RegionEnd, previous, previous)
    }

    pub fn build(self) -> Image {
        self.image
    }
}

pub mod geometry {
    use std::f64::consts::PI;

    use crate::Position;

    /// Star points, starting with the point at the top of the star, alternating between outer and inner radius.
    pub fn calculate_star_points(outer_radius: f64, inner_radius: f64, center: Position) -> Vec<Position> {
        let angle_step = (2.0 * PI) / 10.0;

        (0..10)
            .map(|i| {
                let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
                let angle = angle_step * i as f64 - PI / 2.0;

                Position::new(center.x + radius * angle.cos(), center.y - radius * angle.sin())
            })
            .collect()
    }

}

/// A dark outline macro primitive in the shape of a five-pointed star.
pub fn star_outline_primitive(outer_diameter: f64, inner_diameter: f64, rotation: f64) -> MacroPrimitive {
    let points = geometry::calculate_star_points(outer_diameter / 2.0, inner_diameter / 2.0, Position::new(0.0, 0.0));

    let mut parameters = vec![1.0, points.len() as f64];
    for point in points.iter().chain(points.first()) {
        parameters.push(point.x);
        parameters.push(point.y);
    }
    parameters.push(rotation);

    MacroPrimitive::new(4, parameters)
}
