//! Boolean algebra over filled paths.
//!
//! Operands are applied in order onto an initially empty accumulator: a union adds the operand's area, a
//! subtraction removes it. Each operand is filled with the even-odd rule.
//!
//! The result is computed with a horizontal sweep. Every vertex and every edge crossing splits the plane
//! into slabs in which no two edges cross, so inside each slab the covered area is a list of trapezoids
//! between pairs of edges. Trapezoids that continue between the same pair of edges in the next slab are
//! merged into one polygon.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::trace;

use super::ShapePath;
use crate::Position;

const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Subtract,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    lower: Position,
    upper: Position,
    operand: usize,
}

impl Edge {
    fn x_at(&self, y: f64) -> f64 {
        let dy = self.upper.y - self.lower.y;
        self.lower.x + (y - self.lower.y) * (self.upper.x - self.lower.x) / dy
    }

    fn spans(&self, y: f64) -> bool {
        self.lower.y < y && self.upper.y > y
    }
}

struct Chain {
    left: Vec<Position>,
    right: Vec<Position>,
}

impl Chain {
    fn into_vertices(self) -> Vec<Position> {
        let mut vertices = self.left;
        vertices.extend(self.right.into_iter().rev());
        vertices
    }
}

/// Combine `operands` in order, flattening arcs to within `tolerance`.
pub fn compose(operands: &[(BooleanOp, &ShapePath)], tolerance: f64) -> ShapePath {
    let ops = operands
        .iter()
        .map(|(op, _)| *op)
        .collect::<Vec<_>>();
    let edges = collect_edges(operands, tolerance);
    let ys = sweep_lines(&edges);

    let mut chains: Vec<Chain> = vec![];
    let mut previous: HashMap<(usize, usize), usize> = HashMap::new();
    let mut inside = vec![false; ops.len()];

    for window in ys.windows(2) {
        let (y0, y1) = (window[0], window[1]);
        if y1 - y0 < EPSILON {
            continue;
        }
        let middle = (y0 + y1) / 2.0;

        let mut active = edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.spans(middle))
            .map(|(id, edge)| (id, edge, edge.x_at(middle)))
            .collect::<Vec<_>>();
        active.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal));

        inside.iter_mut().for_each(|flag| *flag = false);
        let mut current: HashMap<(usize, usize), usize> = HashMap::new();
        let mut open: Option<usize> = None;

        for (index, (_, edge, _)) in active.iter().enumerate() {
            inside[edge.operand] = !inside[edge.operand];
            let covered = is_covered(&ops, &inside);

            match (open, covered) {
                (None, true) => open = Some(index),
                (Some(left_index), false) => {
                    open = None;

                    let (left_id, left, _) = active[left_index];
                    let (right_id, right, _) = active[index];
                    let bottom = (left.x_at(y0), right.x_at(y0));
                    let top = (left.x_at(y1), right.x_at(y1));
                    if bottom.1 - bottom.0 < EPSILON && top.1 - top.0 < EPSILON {
                        continue;
                    }

                    let key = (left_id, right_id);
                    let chain_index = match previous.get(&key) {
                        Some(&chain_index) => {
                            let chain = &mut chains[chain_index];
                            chain.left.push(Position::new(top.0, y1));
                            chain.right.push(Position::new(top.1, y1));
                            chain_index
                        }
                        None => {
                            chains.push(Chain {
                                left: vec![Position::new(bottom.0, y0), Position::new(top.0, y1)],
                                right: vec![Position::new(bottom.1, y0), Position::new(top.1, y1)],
                            });
                            chains.len() - 1
                        }
                    };
                    current.insert(key, chain_index);
                }
                _ => {}
            }
        }

        previous = current;
    }

    trace!(
        "boolean compose. operands: {}, edges: {}, sweep lines: {}, polygons: {}",
        operands.len(),
        edges.len(),
        ys.len(),
        chains.len()
    );

    let mut result = ShapePath::new();
    for chain in chains {
        result.add_polygon(&chain.into_vertices());
    }
    result
}

fn is_covered(ops: &[BooleanOp], inside: &[bool]) -> bool {
    ops.iter()
        .zip(inside)
        .fold(false, |covered, (op, inside)| match (inside, op) {
            (true, BooleanOp::Union) => true,
            (true, BooleanOp::Subtract) => false,
            (false, _) => covered,
        })
}

fn collect_edges(operands: &[(BooleanOp, &ShapePath)], tolerance: f64) -> Vec<Edge> {
    let mut edges = vec![];
    for (operand, (_, path)) in operands.iter().enumerate() {
        for contour in path.contours(tolerance) {
            let vertices = &contour.vertices;
            let count = vertices.len();
            if count < 2 {
                continue;
            }
            for i in 0..count {
                let a = vertices[i];
                let b = vertices[(i + 1) % count];
                // horizontal edges never change the inside/outside state along a sweep line
                if (a.y - b.y).abs() < EPSILON {
                    continue;
                }
                let (lower, upper) = if a.y < b.y { (a, b) } else { (b, a) };
                edges.push(Edge {
                    lower,
                    upper,
                    operand,
                });
            }
        }
    }
    edges
}

/// Every edge end point and every crossing between two edges, sorted and deduplicated.
fn sweep_lines(edges: &[Edge]) -> Vec<f64> {
    let mut ys = edges
        .iter()
        .flat_map(|edge| [edge.lower.y, edge.upper.y])
        .collect::<Vec<_>>();

    for (index, a) in edges.iter().enumerate() {
        for b in &edges[index + 1..] {
            if a.upper.y <= b.lower.y || b.upper.y <= a.lower.y {
                continue;
            }
            if let Some(y) = crossing_y(a, b) {
                ys.push(y);
            }
        }
    }

    ys.sort_by(|a, b| a.total_cmp(b));
    ys.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
    ys
}

fn crossing_y(a: &Edge, b: &Edge) -> Option<f64> {
    let r = a.upper - a.lower;
    let s = b.upper - b.lower;
    let denominator = r.x * s.y - r.y * s.x;
    if denominator.abs() < EPSILON {
        return None;
    }
    let offset = b.lower - a.lower;
    let t = (offset.x * s.y - offset.y * s.x) / denominator;
    let u = (offset.x * r.y - offset.y * r.x) / denominator;
    if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
        Some(a.lower.y + t * r.y)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::{centered_rect, circle_flash};

    const TOLERANCE: f64 = 0.0001;

    fn square(min: (f64, f64), max: (f64, f64)) -> ShapePath {
        let mut path = ShapePath::new();
        path.add_rect(&crate::geometry::BoundingBox {
            min: Position::new(min.0, min.1),
            max: Position::new(max.0, max.1),
        });
        path
    }

    fn area(path: &ShapePath) -> f64 {
        path.contours(TOLERANCE)
            .iter()
            .map(|contour| {
                let vertices = &contour.vertices;
                let count = vertices.len();
                (0..count)
                    .map(|i| {
                        let a = vertices[i];
                        let b = vertices[(i + 1) % count];
                        a.x * b.y - b.x * a.y
                    })
                    .sum::<f64>()
                    .abs()
                    / 2.0
            })
            .sum()
    }

    #[test]
    fn test_union_of_overlapping_squares() {
        // given
        let a = square((0.0, 0.0), (2.0, 2.0));
        let b = square((1.0, 1.0), (3.0, 3.0));

        // when
        let result = compose(&[(BooleanOp::Union, &a), (BooleanOp::Union, &b)], TOLERANCE);

        // then
        assert!((area(&result) - 7.0).abs() < 1e-9, "area: {}", area(&result));
        assert!(result.contains(Position::new(0.5, 0.5), TOLERANCE));
        assert!(result.contains(Position::new(2.5, 2.5), TOLERANCE));
        assert!(!result.contains(Position::new(2.5, 0.5), TOLERANCE));
    }

    #[test]
    fn test_subtract() {
        // given
        let a = square((0.0, 0.0), (2.0, 2.0));
        let b = square((1.0, 1.0), (3.0, 3.0));

        // when
        let result = compose(&[(BooleanOp::Union, &a), (BooleanOp::Subtract, &b)], TOLERANCE);

        // then
        assert!((area(&result) - 3.0).abs() < 1e-9, "area: {}", area(&result));
        assert!(!result.contains(Position::new(1.5, 1.5), TOLERANCE));
        assert!(result.contains(Position::new(0.5, 1.5), TOLERANCE));
    }

    #[test]
    fn test_operand_order_matters() {
        // given
        let outer = square((0.0, 0.0), (4.0, 4.0));
        let hole = square((1.0, 1.0), (3.0, 3.0));
        let island = square((1.5, 1.5), (2.5, 2.5));

        // when
        let refilled = compose(
            &[
                (BooleanOp::Union, &outer),
                (BooleanOp::Subtract, &hole),
                (BooleanOp::Union, &island),
            ],
            TOLERANCE,
        );
        let not_refilled = compose(
            &[
                (BooleanOp::Union, &outer),
                (BooleanOp::Union, &island),
                (BooleanOp::Subtract, &hole),
            ],
            TOLERANCE,
        );

        // then
        assert!(refilled.contains(Position::new(2.0, 2.0), TOLERANCE));
        assert!((area(&refilled) - 13.0).abs() < 1e-9);
        assert!(!not_refilled.contains(Position::new(2.0, 2.0), TOLERANCE));
        assert!((area(&not_refilled) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_subtract_from_nothing_is_empty() {
        let a = square((0.0, 0.0), (2.0, 2.0));

        let result = compose(&[(BooleanOp::Subtract, &a)], TOLERANCE);

        assert!(result.is_empty());
    }

    #[test]
    fn test_crossing_shapes() {
        // given
        // two thin bars crossing at an angle, which needs crossing points as sweep lines
        let mut diagonal = ShapePath::new();
        diagonal.add_polygon(&[
            Position::new(0.0, 0.0),
            Position::new(0.5, 0.0),
            Position::new(4.0, 4.0),
            Position::new(3.5, 4.0),
        ]);
        let horizontal = square((0.0, 1.0), (4.0, 1.5));

        // when
        let result = compose(
            &[(BooleanOp::Union, &horizontal), (BooleanOp::Subtract, &diagonal)],
            TOLERANCE,
        );

        // then
        let expected = 4.0 * 0.5 - 0.5 * 0.5;
        assert!((area(&result) - expected).abs() < 1e-9, "area: {}", area(&result));
        assert!(!result.contains(Position::new(1.5, 1.25), TOLERANCE));
        assert!(result.contains(Position::new(3.0, 1.25), TOLERANCE));
    }

    #[test]
    fn test_ring_operand_keeps_its_hole() {
        // given
        let ring = circle_flash(Position::new(0.0, 0.0), 4.0, 2.0);
        let bar = {
            let mut path = ShapePath::new();
            path.add_rect(&centered_rect(Position::new(0.0, 0.0), 0.5, 6.0));
            path
        };

        // when
        let result = compose(&[(BooleanOp::Union, &ring), (BooleanOp::Union, &bar)], TOLERANCE);

        // then
        assert!(result.contains(Position::new(0.0, 0.0), TOLERANCE));
        assert!(!result.contains(Position::new(0.7, 0.0), TOLERANCE));
        assert!(result.contains(Position::new(1.5, 0.0), TOLERANCE));
        assert!(result.contains(Position::new(0.0, 2.8), TOLERANCE));
    }
}
