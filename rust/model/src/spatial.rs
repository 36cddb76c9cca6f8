// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid-based vertex welding for plan geometry.
//!
//! Points closer than the tolerance collapse onto the first point inserted in
//! their neighbourhood. Lookups check the 3x3 block of cells around the query.

use nalgebra::Point2;
use rustc_hash::FxHashMap;

/// A spatial hash grid that assigns stable indices to welded vertices.
#[derive(Debug)]
pub struct VertexGrid {
    cell_size: f64,
    tolerance: f64,
    grid: FxHashMap<(i64, i64), Vec<usize>>,
    points: Vec<Point2<f64>>,
}

impl VertexGrid {
    /// Creates an empty grid. The cell size equals the tolerance, so every
    /// match lies in the 3x3 neighbourhood of the query cell.
    pub fn new(tolerance: f64) -> Self {
        let tolerance = tolerance.max(f64::EPSILON);
        Self {
            cell_size: tolerance,
            tolerance,
            grid: FxHashMap::default(),
            points: Vec::new(),
        }
    }

    /// Returns the index of a vertex within tolerance of `p`, inserting `p`
    /// as a new vertex when there is none.
    pub fn weld(&mut self, p: Point2<f64>) -> usize {
        if let Some(existing) = self.find_near(&p) {
            return existing;
        }
        let index = self.points.len();
        self.points.push(p);
        let cell = self.cell_coords(&p);
        self.grid.entry(cell).or_default().push(index);
        index
    }

    /// Finds a vertex within tolerance of `p`.
    pub fn find_near(&self, p: &Point2<f64>) -> Option<usize> {
        let (cx, cy) = self.cell_coords(p);
        let tol_sq = self.tolerance * self.tolerance;

        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(indices) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &i in indices {
                    if (self.points[i] - p).norm_squared() <= tol_sq {
                        return Some(i);
                    }
                }
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Point2<f64>> {
        self.points
    }

    fn cell_coords(&self, p: &Point2<f64>) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }
}
