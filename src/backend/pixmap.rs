use std::path::Path;

use log::{trace, warn};
use lyon::geom::{point, vector, Angle, Arc, CubicBezierSegment};
use tiny_skia::{
    BlendMode, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use crate::error::SurfaceError;
use crate::geometry::{Affine, PathCommand, ShapePath};
use crate::spacial::point_on_ellipse;
use crate::surface::{CompositeMode, LineCap, LineJoin, Pen, Surface};
use crate::types::Color;

/// A [`Surface`] that rasterizes into a [`tiny_skia::Pixmap`].
///
/// Offscreen layers are full-size pixmaps stacked on top of the base pixmap.
pub struct PixmapSurface {
    base: Pixmap,
    layers: Vec<Pixmap>,
    transform: Affine,
    mode: CompositeMode,
    saved: Vec<(Affine, CompositeMode)>,
    anti_alias: bool,
}

impl PixmapSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let base = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize {
            width,
            height,
        })?;

        Ok(Self {
            base,
            layers: vec![],
            transform: Affine::identity(),
            mode: CompositeMode::SourceOver,
            saved: vec![],
            anti_alias: true,
        })
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn width(&self) -> u32 {
        self.base.width()
    }

    pub fn height(&self) -> u32 {
        self.base.height()
    }

    /// The base pixmap. Painting into an open offscreen layer is not visible here until the layer ends.
    pub fn pixmap(&self) -> &Pixmap {
        &self.base
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.base
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.base
            .encode_png()
            .map_err(|error| SurfaceError::Encoding(error.to_string()))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        self.base
            .save_png(path)
            .map_err(|error| SurfaceError::Encoding(error.to_string()))
    }

    fn target(&mut self) -> &mut Pixmap {
        self.layers
            .last_mut()
            .unwrap_or(&mut self.base)
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = self.anti_alias;
        paint.blend_mode = blend_mode(self.mode);
        paint
    }

    fn device_transform(&self) -> Transform {
        let [sx, ky, kx, sy, tx, ty] = self.transform.to_row();
        Transform::from_row(sx as f32, ky as f32, kx as f32, sy as f32, tx as f32, ty as f32)
    }
}

impl Surface for PixmapSurface {
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
        let Some(path) = to_skia_path(path) else {
            trace!("skipping fill of an empty path");
            return;
        };
        let paint = self.paint(color);
        let transform = self.device_transform();
        self.target()
            .fill_path(&path, &paint, FillRule::EvenOdd, transform, None);
    }

    fn stroke_path(&mut self, path: &ShapePath, pen: &Pen, color: Color) {
        let Some(path) = to_skia_path(path) else {
            trace!("skipping stroke of an empty path");
            return;
        };
        let paint = self.paint(color);
        let transform = self.device_transform();
        let stroke = Stroke {
            width: pen.width as f32,
            line_cap: match pen.cap {
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Flat => tiny_skia::LineCap::Butt,
            },
            line_join: match pen.join {
                LineJoin::Round => tiny_skia::LineJoin::Round,
            },
            ..Stroke::default()
        };
        self.target()
            .stroke_path(&path, &paint, &stroke, transform, None);
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
        let mut layer = self.base.clone();
        layer.fill(tiny_skia::Color::TRANSPARENT);
        self.layers.push(layer);
    }

    fn end_layer(&mut self, mode: CompositeMode) {
        let Some(layer) = self.layers.pop() else {
            warn!("end_layer without a matching begin_layer");
            return;
        };

        let paint = PixmapPaint {
            blend_mode: match mode {
                CompositeMode::SourceOver => BlendMode::SourceOver,
                CompositeMode::Clear => BlendMode::DestinationOut,
            },
            ..PixmapPaint::default()
        };
        self.target()
            .draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
    }
}

fn blend_mode(mode: CompositeMode) -> BlendMode {
    match mode {
        CompositeMode::SourceOver => BlendMode::SourceOver,
        CompositeMode::Clear => BlendMode::Clear,
    }
}

/// Arcs become cubic Béziers, lines and moves map one-to-one.
fn to_skia_path(path: &ShapePath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    let mut has_current = false;

    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(position) => {
                builder.move_to(position.x as f32, position.y as f32);
                has_current = true;
            }
            PathCommand::LineTo(position) => {
                match has_current {
                    true => builder.line_to(position.x as f32, position.y as f32),
                    false => builder.move_to(position.x as f32, position.y as f32),
                }
                has_current = true;
            }
            PathCommand::ArcTo {
                center,
                radii,
                start_angle,
                sweep_angle,
            } => {
                let start = point_on_ellipse(center, radii, start_angle);
                match has_current {
                    true => builder.line_to(start.x as f32, start.y as f32),
                    false => builder.move_to(start.x as f32, start.y as f32),
                }
                has_current = true;

                if radii.x <= 0.0 || radii.y <= 0.0 || sweep_angle == 0.0 {
                    continue;
                }

                let arc = Arc {
                    center: point(center.x, center.y),
                    radii: vector(radii.x, radii.y),
                    start_angle: Angle::degrees(start_angle),
                    sweep_angle: Angle::degrees(sweep_angle),
                    x_rotation: Angle::zero(),
                };
                arc.for_each_cubic_bezier(&mut |segment: &CubicBezierSegment<f64>| {
                    builder.cubic_to(
                        segment.ctrl1.x as f32,
                        segment.ctrl1.y as f32,
                        segment.ctrl2.x as f32,
                        segment.ctrl2.y as f32,
                        segment.to.x as f32,
                        segment.to.y as f32,
                    );
                });
            }
            PathCommand::Close => {
                builder.close();
            }
        }
    }

    builder.finish()
}
