//! Rectilinear (Manhattan) distance matrix provider.
//!
//! Grid travel is restricted to the two axes, so the distance between two
//! points is the sum of their absolute coordinate differences.

use crate::model::Point;
use crate::traits::DistanceMatrixProvider;

/// Rectilinear distance matrix provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanMatrix;

impl ManhattanMatrix {
    /// Rectilinear distance between two grid points.
    pub fn distance(from: Point, to: Point) -> u64 {
        from.x.abs_diff(to.x).saturating_add(from.y.abs_diff(to.y))
    }
}

impl DistanceMatrixProvider for ManhattanMatrix {
    fn matrix_for(&self, locations: &[Point]) -> Vec<Vec<u64>> {
        let n = locations.len();
        let mut matrix = vec![vec![0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    matrix[i][j] = Self::distance(*from, *to);
                }
            }
        }

        matrix
    }
}
