use nalgebra::{Matrix3, Point2, Vector2};

use crate::{Position, Vector};

trait Matrix3Point2Ext {
    fn transform_point2(&self, point: Point2<f64>) -> Point2<f64>;
    fn transform_vector2(&self, vector: Vector2<f64>) -> Vector2<f64>;
}

impl Matrix3Point2Ext for Matrix3<f64> {
    #[inline]
    fn transform_point2(&self, point: Point2<f64>) -> Point2<f64> {
        Point2::new(
            self[(0, 0)] * point.x + self[(0, 1)] * point.y + self[(0, 2)],
            self[(1, 0)] * point.x + self[(1, 1)] * point.y + self[(1, 2)],
        )
    }

    #[inline]
    fn transform_vector2(&self, vector: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self[(0, 0)] * vector.x + self[(0, 1)] * vector.y,
            self[(1, 0)] * vector.x + self[(1, 1)] * vector.y,
        )
    }
}

/// 2D affine transform.
///
/// `translate`, `scale` and `rotate` modify the coordinate system the way a painter does: the new
/// operation is applied to points *before* everything already in the transform, so a chain reads
/// outermost-first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    matrix: Matrix3<f64>,
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self {
            matrix,
        }
    }

    pub fn from_translation(dx: f64, dy: f64) -> Self {
        Self::identity().translate(dx, dy)
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        #[rustfmt::skip]
        let translation = Matrix3::new(
            1.0, 0.0, dx,
            0.0, 1.0, dy,
            0.0, 0.0, 1.0,
        );
        self.then(&Affine::from_matrix(translation))
    }

    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.then(&Affine::from_matrix(Matrix3::new_nonuniform_scaling(&Vector2::new(sx, sy))))
    }

    /// Rotate counter-clockwise (in a y-up space) by `degrees`.
    ///
    /// Quarter turns are exact, so axis swaps and mirrors don't accumulate rounding noise.
    pub fn rotate(self, degrees: f64) -> Self {
        let (sin, cos) = exact_sin_cos(degrees);
        #[rustfmt::skip]
        let rotation = Matrix3::new(
            cos, -sin, 0.0,
            sin,  cos, 0.0,
            0.0,  0.0, 1.0,
        );
        self.then(&Affine::from_matrix(rotation))
    }

    /// `self ∘ inner`, `inner` is applied to points first.
    pub fn then(self, inner: &Affine) -> Self {
        Self {
            matrix: self.matrix * inner.matrix,
        }
    }

    pub fn apply_to_position(&self, position: Position) -> Position {
        self.matrix.transform_point2(position)
    }

    pub fn apply_to_vector(&self, vector: Vector) -> Vector {
        self.matrix.transform_vector2(vector)
    }

    /// `[sx, ky, kx, sy, tx, ty]`, where `x' = sx * x + kx * y + tx` and `y' = ky * x + sy * y + ty`.
    pub fn to_row(&self) -> [f64; 6] {
        let m = &self.matrix;
        [m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)]]
    }
}

fn exact_sin_cos(degrees: f64) -> (f64, f64) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn assert_position_eq(actual: Position, expected: (f64, f64)) {
        assert!(
            (actual.x - expected.0).abs() < 1e-9 && (actual.y - expected.1).abs() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_operations_apply_innermost_last() {
        // given
        let transform = Affine::identity()
            .translate(10.0, 0.0)
            .scale(2.0, 2.0);

        // when
        let result = transform.apply_to_position(Position::new(1.0, 1.0));

        // then
        // scaled first, then translated
        assert_position_eq(result, (12.0, 2.0));
    }

    #[rstest]
    #[case(90.0, (0.0, 1.0))]
    #[case(180.0, (-1.0, 0.0))]
    #[case(270.0, (0.0, -1.0))]
    #[case(-90.0, (0.0, -1.0))]
    #[case(45.0, (std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2))]
    fn test_rotate_unit_x(#[case] degrees: f64, #[case] expected: (f64, f64)) {
        let result = Affine::identity()
            .rotate(degrees)
            .apply_to_position(Position::new(1.0, 0.0));
        assert_position_eq(result, expected);
    }

    #[test]
    fn test_quarter_turns_are_exact() {
        let result = Affine::identity()
            .rotate(270.0)
            .apply_to_vector(Vector::new(1.0, 0.0));
        assert_eq!(result, Vector::new(0.0, -1.0));
    }

    #[test]
    fn test_vectors_ignore_translation() {
        let transform = Affine::from_translation(5.0, 5.0).scale(2.0, 3.0);
        assert_eq!(transform.apply_to_vector(Vector::new(1.0, 1.0)), Vector::new(2.0, 3.0));
    }

    #[test]
    fn test_to_row() {
        let transform = Affine::from_translation(3.0, 4.0).scale(2.0, 5.0);
        assert_eq!(transform.to_row(), [2.0, 0.0, 0.0, 5.0, 3.0, 4.0]);
    }
}
