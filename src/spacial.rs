pub type Vector = nalgebra::Vector2<f64>;
pub type Position = nalgebra::Point2<f64>;

pub trait ToVector {
    fn to_vector(self) -> Vector;
}

impl ToVector for Position {
    fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y)
    }
}

/// Point on the ellipse inscribed in an axis-aligned rect centered on `center`, at `degrees`
/// measured counter-clockwise from +X.
pub fn point_on_ellipse(center: Position, radii: Vector, degrees: f64) -> Position {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Position::new(center.x + radii.x * cos, center.y + radii.y * sin)
}
