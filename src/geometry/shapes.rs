//! Path constructors for the shapes a photoplotter draws, all in the net's local coordinates.

use super::{BoundingBox, ShapePath};
use crate::image::CircleSegment;
use crate::spacial::point_on_ellipse;
use crate::types::Winding;
use crate::{Position, Vector};

/// Where a partial N-gon stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleStop {
    pub direction: Winding,
    /// Degrees.
    pub angle: f64,
}

impl AngleStop {
    /// Ties don't count as passed: a vertex exactly on the stop angle is still emitted.
    fn is_passed(&self, angle: f64) -> bool {
        match self.direction {
            Winding::CounterClockwise => angle > self.angle,
            Winding::Clockwise => angle < self.angle,
        }
    }
}

/// Steps around a circle in `360 / num_points` degree increments starting at `start_angle`.
///
/// Without a stop this yields exactly `num_points` vertices counter-clockwise. With a stop it walks in the
/// stop's direction until the next vertex would pass the stop angle, then ends on the stop angle itself.
pub fn polygon_vertices(
    center: Position,
    radius: f64,
    num_points: u32,
    start_angle: f64,
    stop: Option<AngleStop>,
) -> Vec<Position> {
    if num_points == 0 {
        return vec![];
    }

    let radii = Vector::new(radius, radius);
    let step = 360.0 / num_points as f64;
    let step = match stop.map(|stop| stop.direction) {
        Some(Winding::Clockwise) => -step,
        _ => step,
    };

    let mut vertices = Vec::with_capacity(num_points as usize + 1);
    let mut angle = start_angle;
    for _ in 0..num_points {
        if let Some(stop) = &stop {
            if stop.is_passed(angle) {
                break;
            }
        }
        vertices.push(point_on_ellipse(center, radii, angle));
        angle += step;
    }

    if let Some(stop) = stop {
        vertices.push(point_on_ellipse(center, radii, stop.angle));
    }

    vertices
}

/// Closed regular N-gon, first vertex at `angle` degrees.
pub fn generate_polygon_path(center: Position, radius: f64, num_points: u32, angle: f64) -> ShapePath {
    let mut path = ShapePath::new();
    path.add_polygon(&polygon_vertices(center, radius, num_points, angle, None));
    path
}

/// Centerline of a linear stroke with a circular aperture, stroked with round caps and joins.
pub fn line_path(start: Position, stop: Position) -> ShapePath {
    let mut path = ShapePath::new();
    path.move_to(start);
    path.line_to(stop);
    path
}

/// Outline swept by a rectangular aperture moving from `start` to `stop`.
///
/// The hexagon joins the two end rectangles; the half-size offsets are flipped per axis to follow the
/// direction of travel.
pub fn line_rect_path(start: Position, stop: Position, width: f64, height: f64) -> ShapePath {
    let mut half = Vector::new(width / 2.0, height / 2.0);
    if start.x > stop.x {
        half.x = -half.x;
    }
    if start.y > stop.y {
        half.y = -half.y;
    }

    let mut path = ShapePath::new();
    path.add_polygon(&[
        Position::new(start.x - half.x, start.y - half.y),
        Position::new(start.x - half.x, start.y + half.y),
        Position::new(stop.x - half.x, stop.y + half.y),
        Position::new(stop.x + half.x, stop.y + half.y),
        Position::new(stop.x + half.x, stop.y - half.y),
        Position::new(start.x + half.x, start.y - half.y),
    ]);
    path
}

/// Appends a circular segment to `path`, continuing the current subpath if there is one.
///
/// The segment angles are measured in the direction of travel, `sign` maps them onto counter-clockwise
/// angles: `+1` for clockwise travel, `-1` for counter-clockwise. The sweep always follows the travel
/// direction, whichever of the two angles is larger.
pub fn append_arc(path: &mut ShapePath, segment: &CircleSegment, direction: Winding) {
    let sign = match direction {
        Winding::Clockwise => 1.0,
        Winding::CounterClockwise => -1.0,
    };
    let radii = Vector::new(segment.width.abs() / 2.0, segment.height.abs() / 2.0);

    path.arc_to(
        segment.center,
        radii,
        -sign * segment.angle1,
        -sign * (segment.angle2 - segment.angle1).abs(),
    );
}

/// Open path along a circular segment, for stroking.
pub fn arc_path(segment: &CircleSegment, direction: Winding) -> ShapePath {
    let mut path = ShapePath::new();
    append_arc(&mut path, segment, direction);
    path
}

fn add_hole(path: &mut ShapePath, center: Position, hole_diameter: f64) {
    if hole_diameter > 0.0 {
        let radius = hole_diameter / 2.0;
        path.add_ellipse(center, Vector::new(radius, radius));
    }
}

#[cfg_attr(feature = "profile-renderables", profiling::function)]
pub fn circle_flash(center: Position, diameter: f64, hole_diameter: f64) -> ShapePath {
    let mut path = ShapePath::new();
    let radius = diameter / 2.0;
    path.add_ellipse(center, Vector::new(radius, radius));
    add_hole(&mut path, center, hole_diameter);
    path
}

#[cfg_attr(feature = "profile-renderables", profiling::function)]
pub fn rectangle_flash(center: Position, width: f64, height: f64, hole_diameter: f64) -> ShapePath {
    let mut path = ShapePath::new();
    path.add_rect(&centered_rect(center, width, height));
    add_hole(&mut path, center, hole_diameter);
    path
}

/// Rounded rectangle whose corner radius is half the smaller side.
#[cfg_attr(feature = "profile-renderables", profiling::function)]
pub fn oval_flash(center: Position, width: f64, height: f64, hole_diameter: f64) -> ShapePath {
    let mut path = ShapePath::new();
    path.add_rounded_rect(&centered_rect(center, width, height), width.min(height) / 2.0);
    add_hole(&mut path, center, hole_diameter);
    path
}

#[cfg_attr(feature = "profile-renderables", profiling::function)]
pub fn polygon_flash(
    center: Position,
    diameter: f64,
    num_points: u32,
    rotation: f64,
    hole_diameter: f64,
) -> ShapePath {
    let mut path = generate_polygon_path(center, diameter / 2.0, num_points, rotation);
    add_hole(&mut path, center, hole_diameter);
    path
}

pub fn centered_rect(center: Position, width: f64, height: f64) -> BoundingBox {
    let half = Vector::new(width.abs() / 2.0, height.abs() / 2.0);
    BoundingBox {
        min: center - half,
        max: center + half,
    }
}
