//! Drawing of single nets: strokes, flashes, macro flashes and regions.

use log::trace;

use crate::config::RenderConfiguration;
use crate::error::{Diagnostics, RenderError};
use crate::geometry::shapes::{
    append_arc, arc_path, circle_flash, line_path, line_rect_path, oval_flash, polygon_flash, rectangle_flash,
};
use crate::geometry::ShapePath;
use crate::image::{Aperture, ApertureState, ApertureType, Image, Interpolation, Net, StepAndRepeat};
use crate::macros::{paint_macro, MacroEvaluator, MacroShape};
use crate::painter::PainterState;
use crate::surface::{Pen, Surface};
use crate::types::{Exposure, Winding};
use crate::Position;

/// What a net paints, in the net's local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum NetDrawing {
    Fill(ShapePath),
    Stroke(ShapePath, Pen),
    Macro { shape: MacroShape, point: Position },
}

pub struct NetRenderer<'a> {
    image: &'a Image,
    configuration: &'a RenderConfiguration,
    evaluator: MacroEvaluator,
}

impl<'a> NetRenderer<'a> {
    pub fn new(image: &'a Image, configuration: &'a RenderConfiguration) -> Self {
        Self {
            image,
            configuration,
            evaluator: MacroEvaluator {
                circle_precision: configuration.circle_precision,
                tolerance: configuration.arc_tolerance,
            },
        }
    }

    /// Draws the net at `index` once per step-and-repeat cell, relative to the surface's current transform.
    ///
    /// The drawing is prepared before anything is painted, so an error leaves the surface untouched.
    /// Returns whether anything was drawn, an empty grid draws nothing.
    #[profiling::function]
    pub fn render_net(
        &self,
        surface: &mut dyn Surface,
        painter: &PainterState,
        index: usize,
        step_and_repeat: &StepAndRepeat,
        diagnostics: &mut Diagnostics,
    ) -> Result<bool, RenderError> {
        let Some(drawing) = self.prepare(index, diagnostics)? else {
            return Ok(false);
        };
        if step_and_repeat.x == 0 || step_and_repeat.y == 0 {
            return Ok(false);
        }

        let base = surface.transform();
        for ix in 0..step_and_repeat.x {
            for iy in 0..step_and_repeat.y {
                let cell = base.translate(
                    ix as f64 * step_and_repeat.distance_x,
                    iy as f64 * step_and_repeat.distance_y,
                );
                surface.set_transform(&cell);
                self.draw(surface, painter, &drawing);
            }
        }
        surface.set_transform(&base);

        Ok(true)
    }

    /// Works out what the net at `index` paints, `None` if it paints nothing.
    pub fn prepare(&self, index: usize, diagnostics: &mut Diagnostics) -> Result<Option<NetDrawing>, RenderError> {
        let Some(net) = self.image.nets.get(index) else {
            return Ok(None);
        };

        if net.interpolation == Interpolation::RegionStart {
            let path = region_path(&self.image.nets[index..])?;
            return Ok(Some(NetDrawing::Fill(path)));
        }

        let Some(aperture) = self.image.aperture(net.aperture) else {
            trace!("Net {} uses undefined aperture {}, skipping", index, net.aperture);
            return Ok(None);
        };

        trace!(
            "net {}: {:?} {:?} aperture {} ({:?})",
            index,
            net.aperture_state,
            net.interpolation,
            net.aperture,
            aperture.aperture_type
        );

        match net.aperture_state {
            ApertureState::Off => Ok(None),
            ApertureState::On => self.prepare_stroke(net, aperture),
            ApertureState::Flash => self
                .prepare_flash(index, net, aperture, diagnostics)
                .map(Some),
        }
    }

    fn prepare_stroke(&self, net: &Net, aperture: &Aperture) -> Result<Option<NetDrawing>, RenderError> {
        let interpolation = net.interpolation;

        // only circles and rectangles can be drawn, whatever the interpolation
        let is_circle = match aperture.aperture_type {
            ApertureType::Circle => true,
            ApertureType::Rectangle => false,
            aperture_type => {
                return Err(RenderError::UnsupportedDrawAperture {
                    aperture: net.aperture,
                    aperture_type,
                })
            }
        };

        if interpolation.is_linear() {
            // the hole diameter doesn't apply to strokes
            let drawing = if is_circle {
                NetDrawing::Stroke(line_path(net.start, net.stop), Pen::round(aperture.parameter(0)))
            } else {
                NetDrawing::Fill(line_rect_path(
                    net.start,
                    net.stop,
                    aperture.parameter(0),
                    aperture.parameter(1),
                ))
            };
            return Ok(Some(drawing));
        }

        if let Some(direction) = winding(interpolation) {
            let segment = net
                .circle_segment
                .as_ref()
                .ok_or(RenderError::MissingCircleSegment)?;
            // a rectangle should sweep its shape along the arc, flat caps approximate that
            let pen = if is_circle {
                Pen::round(aperture.parameter(0))
            } else {
                Pen::flat(aperture.parameter(0))
            };
            return Ok(Some(NetDrawing::Stroke(arc_path(segment, direction), pen)));
        }

        match interpolation {
            Interpolation::RegionEnd => Err(RenderError::UnsupportedInterpolation(interpolation)),
            _ => Ok(None),
        }
    }

    fn prepare_flash(
        &self,
        index: usize,
        net: &Net,
        aperture: &Aperture,
        diagnostics: &mut Diagnostics,
    ) -> Result<NetDrawing, RenderError> {
        let point = net.stop;
        let p = |i: usize| aperture.parameter(i);

        let path = match aperture.aperture_type {
            ApertureType::Circle => circle_flash(point, p(0), p(1)),
            ApertureType::Rectangle => rectangle_flash(point, p(0), p(1), p(2)),
            ApertureType::Oval => oval_flash(point, p(0), p(1), p(2)),
            ApertureType::Polygon => polygon_flash(point, p(0), p(1).max(0.0) as u32, p(2), p(3)),
            ApertureType::Macro => {
                let simplified = aperture
                    .simplified
                    .as_ref()
                    .ok_or(RenderError::MissingMacro(net.aperture))?;

                let mut errors = vec![];
                let shape = self
                    .evaluator
                    .evaluate(simplified, &mut errors);
                for error in errors {
                    diagnostics.report(Some(index), error);
                }

                return Ok(NetDrawing::Macro {
                    shape,
                    point,
                });
            }
            aperture_type @ ApertureType::Unknown(_) => return Err(RenderError::UnknownApertureType(aperture_type)),
        };

        Ok(NetDrawing::Fill(path))
    }

    fn draw(&self, surface: &mut dyn Surface, painter: &PainterState, drawing: &NetDrawing) {
        match drawing {
            NetDrawing::Fill(path) => {
                let paint = painter.apply(surface, Exposure::Dark);
                surface.fill_path(path, paint.color);
            }
            NetDrawing::Stroke(path, pen) => {
                let paint = painter.apply(surface, Exposure::Dark);
                surface.stroke_path(path, pen, paint.color);
            }
            NetDrawing::Macro {
                shape,
                point,
            } => paint_macro(
                surface,
                painter,
                shape,
                *point,
                self.configuration.macro_strategy,
                self.configuration.arc_tolerance,
            ),
        }
    }
}

fn winding(interpolation: Interpolation) -> Option<Winding> {
    match interpolation {
        Interpolation::ClockwiseCircular => Some(Winding::Clockwise),
        Interpolation::CounterclockwiseCircular => Some(Winding::CounterClockwise),
        _ => None,
    }
}

/// Outline of the region that starts at `nets[0]`.
///
/// The first net after the region start sets the starting point, following nets add edges up to the
/// region end which closes the outline. A move with the aperture off starts another outline.
pub fn region_path(nets: &[Net]) -> Result<ShapePath, RenderError> {
    let mut path = ShapePath::new();
    let mut first_point = true;

    for net in nets.iter().skip(1) {
        match net.interpolation {
            Interpolation::RegionEnd => {
                path.close();
                return Ok(path);
            }
            Interpolation::RegionStart => return Err(RenderError::UnterminatedRegion),
            Interpolation::Deleted => continue,
            _ => {}
        }

        if first_point {
            path.move_to(net.stop);
            first_point = false;
            continue;
        }

        if let Some(direction) = winding(net.interpolation) {
            let segment = net
                .circle_segment
                .as_ref()
                .ok_or(RenderError::MissingCircleSegment)?;
            append_arc(&mut path, segment, direction);
        } else if net.aperture_state == ApertureState::Off {
            path.close();
            path.move_to(net.stop);
        } else {
            path.line_to(net.stop);
        }
    }

    Err(RenderError::UnterminatedRegion)
}
