use lyon::geom::{point, vector, Angle, Arc, LineSegment};

use super::{Affine, BoundingBox};
use crate::spacial::point_on_ellipse;
use crate::{Position, Vector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Position),
    LineTo(Position),
    /// Elliptical arc on the ellipse centered on `center`. Angles are in degrees, counter-clockwise from
    /// +X, a negative sweep runs clockwise.
    ///
    /// Like a painter's `arcTo`, a line joins the current point to the start of the arc; without a
    /// current point the arc starts a new subpath.
    ArcTo {
        center: Position,
        radii: Vector,
        start_angle: f64,
        sweep_angle: f64,
    },
    Close,
}

/// A path in local (pre-transform) coordinates, filled with the even-odd rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePath {
    commands: Vec<PathCommand>,
}

impl ShapePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, position: Position) {
        self.commands
            .push(PathCommand::MoveTo(position));
    }

    pub fn line_to(&mut self, position: Position) {
        self.commands
            .push(PathCommand::LineTo(position));
    }

    pub fn arc_to(&mut self, center: Position, radii: Vector, start_angle: f64, sweep_angle: f64) {
        self.commands.push(PathCommand::ArcTo {
            center,
            radii,
            start_angle,
            sweep_angle,
        });
    }

    /// Starts a new subpath at the point of the ellipse at `angle`.
    pub fn arc_move_to(&mut self, center: Position, radii: Vector, angle: f64) {
        self.move_to(point_on_ellipse(center, radii, angle));
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// Appends a closed polygon as its own subpath.
    pub fn add_polygon(&mut self, vertices: &[Position]) {
        let Some((first, rest)) = vertices.split_first() else {
            return;
        };
        self.move_to(*first);
        for vertex in rest {
            self.line_to(*vertex);
        }
        self.close();
    }

    pub fn add_rect(&mut self, rect: &BoundingBox) {
        self.add_polygon(&rect.vertices());
    }

    pub fn add_ellipse(&mut self, center: Position, radii: Vector) {
        self.arc_move_to(center, radii, 0.0);
        self.arc_to(center, radii, 0.0, 360.0);
        self.close();
    }

    pub fn add_rounded_rect(&mut self, rect: &BoundingBox, radius: f64) {
        let radius = radius
            .min(rect.width() / 2.0)
            .min(rect.height() / 2.0)
            .max(0.0);
        let radii = Vector::new(radius, radius);
        let (min, max) = (rect.min, rect.max);

        self.move_to(Position::new(max.x - radius, min.y));
        self.arc_to(Position::new(max.x - radius, min.y + radius), radii, 270.0, 90.0);
        self.arc_to(Position::new(max.x - radius, max.y - radius), radii, 0.0, 90.0);
        self.arc_to(Position::new(min.x + radius, max.y - radius), radii, 90.0, 90.0);
        self.arc_to(Position::new(min.x + radius, min.y + radius), radii, 180.0, 90.0);
        self.close();
    }

    pub fn translated(&self, offset: Vector) -> ShapePath {
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(position) => PathCommand::MoveTo(position + offset),
                PathCommand::LineTo(position) => PathCommand::LineTo(position + offset),
                PathCommand::ArcTo {
                    center,
                    radii,
                    start_angle,
                    sweep_angle,
                } => PathCommand::ArcTo {
                    center: center + offset,
                    radii,
                    start_angle,
                    sweep_angle,
                },
                PathCommand::Close => PathCommand::Close,
            })
            .collect();

        ShapePath {
            commands,
        }
    }

    /// Flattens arcs into line segments and maps every vertex through `transform`.
    pub fn transformed(&self, transform: &Affine, tolerance: f64) -> ShapePath {
        let mut result = ShapePath::new();
        for contour in self.contours(tolerance) {
            let vertices = contour
                .vertices
                .iter()
                .map(|vertex| transform.apply_to_position(*vertex))
                .collect::<Vec<_>>();
            let Some((first, rest)) = vertices.split_first() else {
                continue;
            };
            result.move_to(*first);
            for vertex in rest {
                result.line_to(*vertex);
            }
            if contour.closed {
                result.close();
            }
        }
        result
    }

    /// The subpaths of this path as polylines, arcs flattened to within `tolerance`.
    pub fn contours(&self, tolerance: f64) -> Vec<Contour> {
        let mut contours: Vec<Contour> = vec![];
        let mut current: Option<Contour> = None;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(position) => {
                    contours.extend(current.take());
                    current = Some(Contour::starting_at(position));
                }
                PathCommand::LineTo(position) => {
                    current
                        .get_or_insert_with(|| Contour::starting_at(position))
                        .push(position);
                }
                PathCommand::ArcTo {
                    center,
                    radii,
                    start_angle,
                    sweep_angle,
                } => {
                    let start = point_on_ellipse(center, radii, start_angle);
                    let contour = current.get_or_insert_with(|| Contour::starting_at(start));
                    contour.push(start);
                    flatten_arc(center, radii, start_angle, sweep_angle, tolerance, &mut |position| {
                        contour.push(position)
                    });
                }
                PathCommand::Close => {
                    if let Some(mut contour) = current.take() {
                        contour.closed = true;
                        let restart = contour.vertices[0];
                        contours.push(contour);
                        // a painter continues from the start of a closed subpath
                        current = Some(Contour {
                            vertices: vec![restart],
                            closed: false,
                            implicit: true,
                        });
                    }
                }
            }
        }
        contours.extend(current.take());

        contours
            .into_iter()
            .filter(|contour| !(contour.implicit && contour.vertices.len() == 1))
            .collect()
    }

    pub fn bounding_box(&self, tolerance: f64) -> BoundingBox {
        let points = self
            .contours(tolerance)
            .into_iter()
            .flat_map(|contour| contour.vertices)
            .collect::<Vec<_>>();
        BoundingBox::from_points(&points)
    }

    /// Even-odd containment test against the flattened path, every subpath treated as closed.
    pub fn contains(&self, position: Position, tolerance: f64) -> bool {
        let mut inside = false;
        for contour in self.contours(tolerance) {
            let vertices = &contour.vertices;
            let count = vertices.len();
            for i in 0..count {
                let a = vertices[i];
                let b = vertices[(i + 1) % count];
                if (a.y > position.y) != (b.y > position.y) {
                    let x = a.x + (position.y - a.y) * (b.x - a.x) / (b.y - a.y);
                    if position.x < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub vertices: Vec<Position>,
    pub closed: bool,
    implicit: bool,
}

impl Contour {
    fn starting_at(position: Position) -> Self {
        Self {
            vertices: vec![position],
            closed: false,
            implicit: false,
        }
    }

    fn push(&mut self, position: Position) {
        self.implicit = false;
        if self.vertices.last() != Some(&position) {
            self.vertices.push(position);
        }
    }
}

fn flatten_arc(
    center: Position,
    radii: Vector,
    start_angle: f64,
    sweep_angle: f64,
    tolerance: f64,
    callback: &mut dyn FnMut(Position),
) {
    if radii.x <= 0.0 || radii.y <= 0.0 || sweep_angle == 0.0 {
        return;
    }

    let arc = Arc {
        center: point(center.x, center.y),
        radii: vector(radii.x, radii.y),
        start_angle: Angle::degrees(start_angle),
        sweep_angle: Angle::degrees(sweep_angle),
        x_rotation: Angle::zero(),
    };
    arc.for_each_flattened(tolerance, &mut |segment: &LineSegment<f64>| {
        callback(Position::new(segment.to.x, segment.to.y));
    });

    // land exactly on the end point
    callback(point_on_ellipse(center, radii, start_angle + sweep_angle));
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 0.0001;

    #[test]
    fn test_polygon_contour() {
        // given
        let mut path = ShapePath::new();
        path.add_polygon(&[
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
        ]);

        // when
        let contours = path.contours(TOLERANCE);

        // then
        assert_eq!(contours.len(), 1);
        assert!(contours[0].closed);
        assert_eq!(contours[0].vertices.len(), 3);
    }

    #[test]
    fn test_ellipse_vertices_lie_on_circle() {
        // given
        let mut path = ShapePath::new();
        path.add_ellipse(Position::new(1.0, 1.0), Vector::new(2.0, 2.0));

        // when
        let contours = path.contours(TOLERANCE);

        // then
        assert_eq!(contours.len(), 1);
        assert!(contours[0].vertices.len() > 16);
        for vertex in &contours[0].vertices {
            let distance = (vertex - Position::new(1.0, 1.0)).norm();
            assert!((distance - 2.0).abs() < 1e-6, "distance: {}", distance);
        }
    }

    #[test]
    fn test_arc_to_joins_current_point() {
        // given
        let mut path = ShapePath::new();
        path.move_to(Position::new(0.0, 0.0));
        path.arc_to(Position::new(0.0, 0.0), Vector::new(1.0, 1.0), 0.0, 90.0);

        // when
        let contours = path.contours(TOLERANCE);

        // then
        let vertices = &contours[0].vertices;
        assert_eq!(vertices[0], Position::new(0.0, 0.0));
        assert_eq!(vertices[1], Position::new(1.0, 0.0));
        let end = vertices.last().unwrap();
        assert!((end.x - 0.0).abs() < 1e-9 && (end.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_with_hole() {
        // given
        let mut path = ShapePath::new();
        path.add_ellipse(Position::new(0.0, 0.0), Vector::new(2.0, 2.0));
        path.add_ellipse(Position::new(0.0, 0.0), Vector::new(1.0, 1.0));

        // then
        assert!(!path.contains(Position::new(0.0, 0.0), TOLERANCE));
        assert!(path.contains(Position::new(1.5, 0.1), TOLERANCE));
        assert!(!path.contains(Position::new(2.5, 0.0), TOLERANCE));
    }

    #[test]
    fn test_translated_keeps_arcs() {
        // given
        let mut path = ShapePath::new();
        path.add_ellipse(Position::new(0.0, 0.0), Vector::new(1.0, 1.0));

        // when
        let translated = path.translated(Vector::new(5.0, -5.0));

        // then
        assert!(matches!(
            translated.commands()[1],
            PathCommand::ArcTo { center, .. } if center == Position::new(5.0, -5.0)
        ));
    }

    #[test]
    fn test_rounded_rect_bounds() {
        // given
        let mut path = ShapePath::new();
        path.add_rounded_rect(
            &BoundingBox {
                min: Position::new(-2.0, -1.0),
                max: Position::new(2.0, 1.0),
            },
            1.0,
        );

        // when
        let bbox = path.bounding_box(TOLERANCE);

        // then
        assert!((bbox.min.x - -2.0).abs() < 1e-6);
        assert!((bbox.max.x - 2.0).abs() < 1e-6);
        assert!((bbox.min.y - -1.0).abs() < 1e-6);
        assert!((bbox.max.y - 1.0).abs() < 1e-6);
        assert!(path.contains(Position::new(1.5, 0.0), TOLERANCE));
        // the corners are rounded away
        assert!(!path.contains(Position::new(1.95, 0.95), TOLERANCE));
    }

    #[test]
    fn test_transformed_maps_vertices() {
        // given
        let mut path = ShapePath::new();
        path.add_polygon(&[
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
        ]);

        // when
        let transformed = path.transformed(&Affine::from_translation(1.0, 2.0).scale(2.0, 2.0), TOLERANCE);

        // then
        assert_eq!(transformed.commands(), &[
            PathCommand::MoveTo(Position::new(1.0, 2.0)),
            PathCommand::LineTo(Position::new(3.0, 2.0)),
            PathCommand::LineTo(Position::new(3.0, 4.0)),
            PathCommand::Close,
        ]);
    }
}
