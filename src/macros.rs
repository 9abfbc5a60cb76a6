//! Aperture macro evaluation.
//!
//! A simplified macro is evaluated into a [`MacroShape`], an ordered list of union/subtract steps in the
//! macro's own coordinates. Painting it at a flash point then either resolves the steps with the path
//! algebra and fills the result once, or paints every step into an offscreen layer.

use log::trace;

use crate::config::MacroStrategy;
use crate::error::RenderError;
use crate::geometry::boolean::{self, BooleanOp};
use crate::geometry::shapes::{centered_rect, generate_polygon_path, polygon_vertices, AngleStop};
use crate::geometry::{Affine, BoundingBox, ShapePath};
use crate::image::{MacroPrimitive, MacroPrimitiveKind, SimplifiedMacro};
use crate::painter::PainterState;
use crate::spacial::ToVector;
use crate::surface::{CompositeMode, Surface};
use crate::types::{Exposure, Winding};
use crate::{Position, Vector};

#[derive(Debug, Clone, PartialEq)]
pub struct MacroStep {
    pub op: BooleanOp,
    pub path: ShapePath,
}

/// The composite shape of a macro aperture, centered on the flash point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroShape {
    pub steps: Vec<MacroStep>,
}

impl MacroShape {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The covered area as a single path.
    pub fn resolve(&self, tolerance: f64) -> ShapePath {
        let operands = self
            .steps
            .iter()
            .map(|step| (step.op, &step.path))
            .collect::<Vec<_>>();
        boolean::compose(&operands, tolerance)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MacroEvaluator {
    /// Point count of the N-gon used for circles.
    pub circle_precision: u32,
    /// Flattening tolerance used when rotating curved primitives.
    pub tolerance: f64,
}

impl MacroEvaluator {
    /// Evaluates every primitive in order. Primitives that can't be evaluated are reported to
    /// `diagnostics` and left out.
    pub fn evaluate(&self, simplified: &SimplifiedMacro, diagnostics: &mut Vec<RenderError>) -> MacroShape {
        let mut shape = MacroShape::default();
        let mut exposure = Exposure::Dark;

        for primitive in &simplified.primitives {
            match self.evaluate_primitive(primitive, exposure, diagnostics) {
                Ok(Evaluated {
                    exposure: next_exposure,
                    steps,
                }) => {
                    if let Some(next_exposure) = next_exposure {
                        exposure = next_exposure;
                    }
                    shape.steps.extend(steps);
                }
                Err(error) => diagnostics.push(error),
            }
        }

        trace!(
            "evaluated macro. primitives: {}, steps: {}",
            simplified.primitives.len(),
            shape.steps.len()
        );

        shape
    }

    fn evaluate_primitive(
        &self,
        primitive: &MacroPrimitive,
        previous: Exposure,
        diagnostics: &mut Vec<RenderError>,
    ) -> Result<Evaluated, RenderError> {
        let kind = primitive.kind;

        match kind {
            MacroPrimitiveKind::Circle => {
                let p = required(primitive, 4)?;
                let exposure = Exposure::from_macro_parameter(p[0], previous);
                let path = generate_polygon_path(Position::new(p[2], p[3]), p[1] / 2.0, self.circle_precision, 0.0);
                Ok(self.exposed(exposure, path, optional(p, 4)))
            }
            MacroPrimitiveKind::Outline => {
                let p = required(primitive, 2)?;
                let exposure = Exposure::from_macro_parameter(p[0], previous);
                // the last point repeats the first
                let points = (p[1].max(0.0) as usize).saturating_add(1);
                let rotation_index = points.saturating_mul(2).saturating_add(2);
                let p = required(primitive, rotation_index)?;

                let vertices = p[2..rotation_index]
                    .chunks_exact(2)
                    .map(|pair| Position::new(pair[0], pair[1]))
                    .collect::<Vec<_>>();
                let mut path = ShapePath::new();
                path.add_polygon(&vertices);

                Ok(self.exposed(exposure, path, optional(p, rotation_index)))
            }
            MacroPrimitiveKind::Polygon => {
                let p = required(primitive, 5)?;
                let exposure = Exposure::from_macro_parameter(p[0], previous);
                let center = Position::new(p[2], p[3]);
                let rotation = optional(p, 5);
                check_rotation_origin(kind, center, rotation, diagnostics);
                let path = generate_polygon_path(center, p[4] / 2.0, p[1].max(0.0) as u32, 0.0);
                Ok(self.exposed(exposure, path, rotation))
            }
            MacroPrimitiveKind::Moire => {
                let p = required(primitive, 8)?;
                let rotation = optional(p, 8);
                check_rotation_origin(kind, Position::new(p[0], p[1]), rotation, diagnostics);
                Ok(self.unioned(moire(p), rotation))
            }
            MacroPrimitiveKind::Thermal => {
                let p = required(primitive, 5)?;
                let rotation = optional(p, 5);
                check_rotation_origin(kind, Position::new(p[0], p[1]), rotation, diagnostics);
                Ok(self.unioned(vec![self.thermal(p)], rotation))
            }
            MacroPrimitiveKind::Line20 => {
                let p = required(primitive, 6)?;
                let exposure = Exposure::from_macro_parameter(p[0], previous);
                let path = vector_line(p[1], Position::new(p[2], p[3]), Position::new(p[4], p[5]));
                Ok(self.exposed(exposure, path, optional(p, 6)))
            }
            MacroPrimitiveKind::Line21 => {
                let p = required(primitive, 5)?;
                let exposure = Exposure::from_macro_parameter(p[0], previous);
                let path = centered_rect(Position::new(p[3], p[4]), p[1], p[2]).to_path();
                Ok(self.exposed(exposure, path, optional(p, 5)))
            }
            MacroPrimitiveKind::Line22 => {
                let p = required(primitive, 5)?;
                let exposure = Exposure::from_macro_parameter(p[0], previous);
                let lower_left = Position::new(p[3], p[4]);
                let path = BoundingBox {
                    min: lower_left,
                    max: lower_left + Vector::new(p[1], p[2]),
                }
                .to_path();
                Ok(self.exposed(exposure, path, optional(p, 5)))
            }
            MacroPrimitiveKind::Unknown(_) => Err(RenderError::UnknownMacroPrimitive(kind)),
        }
    }

    fn exposed(&self, exposure: Exposure, path: ShapePath, rotation: f64) -> Evaluated {
        let op = match exposure {
            Exposure::Dark => BooleanOp::Union,
            Exposure::Clear => BooleanOp::Subtract,
        };
        Evaluated {
            exposure: Some(exposure),
            steps: vec![MacroStep {
                op,
                path: self.rotated(path, rotation),
            }],
        }
    }

    /// Moiré and thermal primitives are always dark and leave the exposure alone.
    fn unioned(&self, paths: Vec<ShapePath>, rotation: f64) -> Evaluated {
        Evaluated {
            exposure: None,
            steps: paths
                .into_iter()
                .map(|path| MacroStep {
                    op: BooleanOp::Union,
                    path: self.rotated(path, rotation),
                })
                .collect(),
        }
    }

    /// Rotates around the macro origin.
    fn rotated(&self, path: ShapePath, rotation: f64) -> ShapePath {
        if rotation == 0.0 {
            return path;
        }
        path.transformed(&Affine::identity().rotate(rotation), self.tolerance)
    }

    /// Four ring segments between the inner and outer diameter, separated by a crosshair shaped gap.
    ///
    /// Parameters: center x, center y, outer diameter, inner diameter, gap thickness.
    fn thermal(&self, p: &[f64]) -> ShapePath {
        let center = Position::new(p[0], p[1]);
        let outer_radius = p[2] / 2.0;
        let inner_radius = p[3] / 2.0;
        let half_gap = p[4] / 2.0;

        let outer_gap = half_gap.atan2(outer_radius).to_degrees();
        let inner_gap = half_gap.atan2(inner_radius).to_degrees();

        let mut path = ShapePath::new();
        for quadrant in 0..4 {
            let base = 90.0 * quadrant as f64;

            let mut vertices = polygon_vertices(
                center,
                outer_radius,
                self.circle_precision,
                base + outer_gap,
                Some(AngleStop {
                    direction: Winding::CounterClockwise,
                    angle: base + 90.0 - outer_gap,
                }),
            );
            vertices.extend(polygon_vertices(
                center,
                inner_radius,
                self.circle_precision,
                base + 90.0 - inner_gap,
                Some(AngleStop {
                    direction: Winding::Clockwise,
                    angle: base + inner_gap,
                }),
            ));
            path.add_polygon(&vertices);
        }
        path
    }
}

struct Evaluated {
    /// The exposure following primitives toggle from, if this primitive changed it.
    exposure: Option<Exposure>,
    steps: Vec<MacroStep>,
}

fn required(primitive: &MacroPrimitive, count: usize) -> Result<&[f64], RenderError> {
    if primitive.parameters.len() < count {
        return Err(RenderError::MissingMacroParameter {
            kind: primitive.kind,
            required: count,
            actual: primitive.parameters.len(),
        });
    }
    Ok(&primitive.parameters)
}

/// Rotation is only defined for these primitives when they are centered on the macro origin. The
/// primitive is still drawn, rotated around the origin.
fn check_rotation_origin(kind: MacroPrimitiveKind, center: Position, rotation: f64, diagnostics: &mut Vec<RenderError>) {
    if rotation != 0.0 && (center.x != 0.0 || center.y != 0.0) {
        diagnostics.push(RenderError::RotatedOffOrigin(kind, center.x, center.y));
    }
}

/// Trailing rotation parameters may be left out.
fn optional(parameters: &[f64], index: usize) -> f64 {
    parameters
        .get(index)
        .copied()
        .unwrap_or(0.0)
}

/// Rectangle of `width` around the line from `start` to `end`.
fn vector_line(width: f64, start: Position, end: Position) -> ShapePath {
    let direction = (end.y - start.y).atan2(end.x - start.x);
    let half = width / 2.0;
    let left = Vector::new(
        half * (direction + std::f64::consts::FRAC_PI_2).cos(),
        half * (direction + std::f64::consts::FRAC_PI_2).sin(),
    );

    let mut path = ShapePath::new();
    path.add_polygon(&[start + left, start - left, end - left, end + left]);
    path
}

/// Parameters: center x, center y, outer diameter, ring thickness, ring gap, max number of rings,
/// crosshair thickness, crosshair length.
fn moire(p: &[f64]) -> Vec<ShapePath> {
    let center = Position::new(p[0], p[1]);
    let (outer_diameter, thickness, gap) = (p[2], p[3], p[4]);
    let rings = p[5].max(0.0) as usize;
    let (cross_thickness, cross_length) = (p[6], p[7]);

    let mut paths = vec![];
    for ring in 0..rings {
        let outer = outer_diameter / 2.0 - ring as f64 * (thickness + gap);
        // rings must shrink, otherwise every further ring repeats the first
        if outer <= 0.0 || (ring > 0 && thickness + gap <= 0.0) {
            break;
        }
        let inner = outer - thickness;

        let mut path = ShapePath::new();
        path.add_ellipse(center, Vector::new(outer, outer));
        if inner > 0.0 {
            path.add_ellipse(center, Vector::new(inner, inner));
        }
        paths.push(path);
    }

    paths.push(centered_rect(center, cross_length, cross_thickness).to_path());
    paths.push(centered_rect(center, cross_thickness, cross_length).to_path());

    paths
}

/// Paints `shape` centered on `point` with the dark paint of the current layer.
#[profiling::function]
pub fn paint_macro(
    surface: &mut dyn Surface,
    painter: &PainterState,
    shape: &MacroShape,
    point: Position,
    strategy: MacroStrategy,
    tolerance: f64,
) {
    let offset = point.to_vector();

    match strategy {
        MacroStrategy::PathAlgebra => {
            let path = shape
                .resolve(tolerance)
                .translated(offset);
            let paint = painter.apply(surface, Exposure::Dark);
            surface.fill_path(&path, paint.color);
        }
        MacroStrategy::OffscreenBuffer => {
            let paint = painter.paint_for(Exposure::Dark);

            surface.save();
            surface.begin_layer();
            for step in &shape.steps {
                let mode = match step.op {
                    BooleanOp::Union => CompositeMode::SourceOver,
                    BooleanOp::Subtract => CompositeMode::Clear,
                };
                surface.set_composite_mode(mode);
                surface.fill_path(&step.path.translated(offset), paint.color);
            }
            surface.end_layer(paint.mode);
            surface.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::RenderConfiguration;
    use crate::testing::{star_outline_primitive, RecordingSurface, SurfaceCall};

    const TOLERANCE: f64 = 0.0001;

    fn evaluator() -> MacroEvaluator {
        MacroEvaluator {
            circle_precision: 100,
            tolerance: TOLERANCE,
        }
    }

    fn evaluate(primitives: Vec<MacroPrimitive>) -> (MacroShape, Vec<RenderError>) {
        let mut diagnostics = vec![];
        let shape = evaluator().evaluate(
            &SimplifiedMacro {
                primitives,
            },
            &mut diagnostics,
        );
        (shape, diagnostics)
    }

    #[test]
    fn test_circle_is_a_fine_ngon() {
        // when
        let (shape, diagnostics) = evaluate(vec![MacroPrimitive::new(1, vec![1.0, 2.0, 3.0, 4.0])]);

        // then
        assert!(diagnostics.is_empty());
        assert_eq!(shape.steps.len(), 1);
        assert_eq!(shape.steps[0].op, BooleanOp::Union);
        let contours = shape.steps[0].path.contours(TOLERANCE);
        assert_eq!(contours[0].vertices.len(), 100);
        assert_eq!(contours[0].vertices[0], Position::new(4.0, 4.0));
    }

    #[test]
    fn test_exposure_toggle_sequence() {
        // given
        let circle = |exposure: f64| MacroPrimitive::new(1, vec![exposure, 1.0, 0.0, 0.0]);

        // when
        let (shape, _) = evaluate(vec![circle(1.0), circle(2.0), circle(2.0)]);

        // then
        let ops = shape
            .steps
            .iter()
            .map(|step| step.op)
            .collect::<Vec<_>>();
        assert_eq!(ops, vec![BooleanOp::Union, BooleanOp::Subtract, BooleanOp::Union]);
    }

    #[test]
    fn test_thermal_ignores_exposure_and_keeps_toggle_state() {
        // given
        let thermal = MacroPrimitive::new(7, vec![0.0, 0.0, 4.0, 2.0, 0.5, 0.0]);
        let circle = MacroPrimitive::new(1, vec![2.0, 1.0, 0.0, 0.0]);

        // when
        let (shape, _) = evaluate(vec![MacroPrimitive::new(1, vec![0.0, 1.0, 5.0, 5.0]), thermal, circle]);

        // then
        // clear, thermal always dark, then toggled from clear to dark
        let ops = shape
            .steps
            .iter()
            .map(|step| step.op)
            .collect::<Vec<_>>();
        assert_eq!(ops, vec![BooleanOp::Subtract, BooleanOp::Union, BooleanOp::Union]);
    }

    #[test]
    fn test_outline_rotates_around_origin() {
        // given
        let outline = MacroPrimitive::new(4, vec![
            1.0, 3.0, //
            1.0, 0.0, //
            2.0, 0.0, //
            2.0, 1.0, //
            1.0, 0.0, //
            90.0,
        ]);

        // when
        let (shape, diagnostics) = evaluate(vec![outline]);

        // then
        assert!(diagnostics.is_empty());
        let vertices = &shape.steps[0].path.contours(TOLERANCE)[0].vertices;
        let expected = [(0.0, 1.0), (0.0, 2.0), (-1.0, 2.0)];
        for (vertex, expected) in vertices.iter().zip(expected) {
            assert!((vertex.x - expected.0).abs() < 1e-9 && (vertex.y - expected.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_outline_with_too_few_points_is_skipped() {
        // when
        let (shape, diagnostics) = evaluate(vec![
            MacroPrimitive::new(4, vec![1.0, 3.0, 0.0, 0.0, 1.0, 0.0]),
            MacroPrimitive::new(1, vec![1.0, 1.0, 0.0, 0.0]),
        ]);

        // then
        assert_eq!(shape.steps.len(), 1);
        assert_eq!(diagnostics, vec![RenderError::MissingMacroParameter {
            kind: MacroPrimitiveKind::Outline,
            required: 10,
            actual: 6,
        }]);
    }

    #[test]
    fn test_rotated_polygon_off_origin_is_reported_but_drawn() {
        // when
        let (shape, diagnostics) = evaluate(vec![MacroPrimitive::new(5, vec![1.0, 6.0, 1.0, 0.0, 1.0, 90.0])]);

        // then
        assert_eq!(diagnostics, vec![RenderError::RotatedOffOrigin(MacroPrimitiveKind::Polygon, 1.0, 0.0)]);
        assert_eq!(shape.steps.len(), 1);
        // rotated around the macro origin, not around its own center
        assert!(shape.steps[0]
            .path
            .contains(Position::new(0.0, 1.0), TOLERANCE));
    }

    #[test]
    fn test_rotated_thermal_off_origin_is_reported() {
        let (shape, diagnostics) = evaluate(vec![MacroPrimitive::new(7, vec![0.0, 2.0, 3.0, 2.0, 0.4, 45.0])]);

        assert_eq!(diagnostics, vec![RenderError::RotatedOffOrigin(MacroPrimitiveKind::Thermal, 0.0, 2.0)]);
        assert_eq!(shape.steps.len(), 1);
    }

    #[test]
    fn test_unknown_primitive_is_skipped() {
        // when
        let (shape, diagnostics) = evaluate(vec![
            MacroPrimitive::new(3, vec![1.0]),
            MacroPrimitive::new(21, vec![1.0, 2.0, 1.0, 0.0, 0.0]),
        ]);

        // then
        assert_eq!(diagnostics, vec![RenderError::UnknownMacroPrimitive(MacroPrimitiveKind::Unknown(3))]);
        assert_eq!(shape.steps.len(), 1);
    }

    #[test]
    fn test_vector_line_is_perpendicular_to_its_direction() {
        // when
        let (shape, _) = evaluate(vec![MacroPrimitive::new(20, vec![1.0, 1.0, 0.0, 0.0, 10.0, 10.0, 0.0])]);

        // then
        let path = &shape.steps[0].path;
        assert!(path.contains(Position::new(5.0, 5.0), TOLERANCE));
        assert!(path.contains(Position::new(5.3, 4.7), TOLERANCE));
        assert!(!path.contains(Position::new(5.5, 4.5), TOLERANCE));
        assert!(!path.contains(Position::new(-0.3, -0.3), TOLERANCE));
    }

    #[rstest]
    #[case(21, (0.5, 0.25), true)]
    #[case(21, (2.5, 1.2), false)]
    #[case(22, (0.5, 0.25), false)]
    #[case(22, (2.5, 1.2), true)]
    fn test_rectangle_lines(#[case] code: u32, #[case] probe: (f64, f64), #[case] expected: bool) {
        // given
        // 2 x 1, centered on (1, 0.5) for line 21, lower left corner at (1, 0.5) for line 22
        let primitive = MacroPrimitive::new(code, vec![1.0, 2.0, 1.0, 1.0, 0.5, 0.0]);

        // when
        let (shape, _) = evaluate(vec![primitive]);

        // then
        assert_eq!(
            shape.steps[0]
                .path
                .contains(Position::new(probe.0, probe.1), TOLERANCE),
            expected
        );
    }

    #[test]
    fn test_thermal_geometry() {
        // given
        let thermal = MacroPrimitive::new(7, vec![0.0, 0.0, 4.0, 2.0, 0.5, 0.0]);

        // when
        let (shape, _) = evaluate(vec![thermal]);

        // then
        let path = &shape.steps[0].path;
        assert_eq!(path.contours(TOLERANCE).len(), 4);
        let diagonal = std::f64::consts::FRAC_1_SQRT_2 * 1.5;
        for (x, y) in [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)] {
            assert!(path.contains(Position::new(x * diagonal, y * diagonal), TOLERANCE));
        }
        // gaps on the axes
        assert!(!path.contains(Position::new(1.5, 0.0), TOLERANCE));
        assert!(!path.contains(Position::new(0.0, -1.5), TOLERANCE));
        // just outside the gap
        assert!(path.contains(Position::new(1.5, 0.3), TOLERANCE));
        // center and beyond the outer diameter
        assert!(!path.contains(Position::new(0.0, 0.0), TOLERANCE));
        assert!(!path.contains(Position::new(1.5, 1.5), TOLERANCE));
    }

    #[test]
    fn test_thermal_rotation() {
        let thermal = MacroPrimitive::new(7, vec![0.0, 0.0, 4.0, 2.0, 0.5, 45.0]);

        let (shape, _) = evaluate(vec![thermal]);

        let path = &shape.steps[0].path;
        let diagonal = std::f64::consts::FRAC_1_SQRT_2 * 1.5;
        assert!(path.contains(Position::new(1.5, 0.0), TOLERANCE));
        assert!(!path.contains(Position::new(diagonal, diagonal), TOLERANCE));
    }

    #[test]
    fn test_moire() {
        // given
        // rings: 4..3 and 2..1 in radius, crosshair 0.2 thick, 10 long
        let moire = MacroPrimitive::new(6, vec![0.0, 0.0, 8.0, 1.0, 1.0, 2.0, 0.2, 10.0, 0.0]);

        // when
        let (shape, diagnostics) = evaluate(vec![moire]);
        let resolved = shape.resolve(TOLERANCE);

        // then
        assert!(diagnostics.is_empty());
        assert_eq!(shape.steps.len(), 4);
        assert!(shape
            .steps
            .iter()
            .all(|step| step.op == BooleanOp::Union));
        let probe = |x: f64, y: f64| resolved.contains(Position::new(x, y), TOLERANCE);
        assert!(probe(2.5, 2.5));
        assert!(!probe(1.75, 1.75));
        assert!(probe(1.0, 1.0));
        assert!(!probe(0.5, 0.5));
        assert!(probe(0.0, 0.0));
        assert!(probe(4.5, 0.0));
        assert!(!probe(5.5, 0.0));
    }

    #[test]
    fn test_clear_primitive_cuts_a_hole() {
        // given
        let square = MacroPrimitive::new(21, vec![1.0, 4.0, 4.0, 0.0, 0.0, 0.0]);
        let hole = MacroPrimitive::new(1, vec![0.0, 2.0, 0.0, 0.0]);

        // when
        let (shape, _) = evaluate(vec![square, hole]);
        let resolved = shape.resolve(TOLERANCE);

        // then
        assert!(!resolved.contains(Position::new(0.0, 0.0), TOLERANCE));
        assert!(resolved.contains(Position::new(1.5, 1.5), TOLERANCE));
    }

    #[test]
    fn test_star_outline() {
        let (shape, diagnostics) = evaluate(vec![star_outline_primitive(2.0, 1.0, 0.0)]);

        assert!(diagnostics.is_empty());
        let path = &shape.steps[0].path;
        assert!(path.contains(Position::new(0.0, 0.0), TOLERANCE));
        assert!(path.contains(Position::new(0.0, 0.9), TOLERANCE));
        assert!(!path.contains(Position::new(0.6, 0.6), TOLERANCE));
    }

    fn square_with_hole() -> MacroShape {
        evaluate(vec![
            MacroPrimitive::new(21, vec![1.0, 4.0, 4.0, 0.0, 0.0, 0.0]),
            MacroPrimitive::new(21, vec![0.0, 2.0, 2.0, 0.0, 0.0, 0.0]),
        ])
        .0
    }

    #[test]
    fn test_path_algebra_fills_once_at_the_flash_point() {
        // given
        let mut surface = RecordingSurface::new();
        let painter = PainterState::new(&RenderConfiguration::default());

        // when
        paint_macro(
            &mut surface,
            &painter,
            &square_with_hole(),
            Position::new(10.0, 0.0),
            MacroStrategy::PathAlgebra,
            TOLERANCE,
        );

        // then
        let fills = surface.fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].mode, CompositeMode::SourceOver);
        assert!(fills[0].contains_device(Position::new(11.5, 1.5)));
        assert!(!fills[0].contains_device(Position::new(10.0, 0.0)));
    }

    #[test]
    fn test_offscreen_buffer_composites_each_step() {
        // given
        let mut surface = RecordingSurface::new();
        let mut painter = PainterState::new(&RenderConfiguration::default());
        painter.set_inverted(true);

        // when
        paint_macro(
            &mut surface,
            &painter,
            &square_with_hole(),
            Position::new(10.0, 0.0),
            MacroStrategy::OffscreenBuffer,
            TOLERANCE,
        );

        // then
        let calls = surface.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], SurfaceCall::BeginLayer);
        let SurfaceCall::Fill(square) = &calls[1] else {
            panic!("expected a fill, got {:?}", calls[1]);
        };
        assert_eq!(square.mode, CompositeMode::SourceOver);
        assert_eq!(square.layer_depth, 1);
        assert!(square.contains_device(Position::new(10.0, 0.0)));
        let SurfaceCall::Fill(hole) = &calls[2] else {
            panic!("expected a fill, got {:?}", calls[2]);
        };
        assert_eq!(hole.mode, CompositeMode::Clear);
        // the inverted layer erases with the composited macro
        assert_eq!(calls[3], SurfaceCall::EndLayer(CompositeMode::Clear));
        assert_eq!(surface.composite_mode(), CompositeMode::SourceOver);
    }
}
