// Copyright 2016-2018 Matthew D. Michelotti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::broad::{BroadPhase, Domain, MAX_LEVEL};
use crate::collider::{BoxView, Collider, ColliderId, ColliderSet};
use crate::error::{Error, Result};
use crate::geom::{v2, Vec2};
use crate::index_rect::IndexRect;

/// Largest number of cells per axis, matching the finest multi-resolution level.
pub const MAX_CELLS_PER_AXIS: usize = 1 << MAX_LEVEL;

/// The ids registered in one grid cell.
pub type Cell = Vec<ColliderId>;

/// A dense, row-major 2D array of cells.
#[derive(Clone, Debug)]
pub struct CellGrid<T> {
    columns: usize,
    rows: usize,
    cells: Vec<T>,
}

impl<T: Default> CellGrid<T> {
    pub(crate) fn new(columns: usize, rows: usize) -> Result<CellGrid<T>> {
        let invalid = Error::InvalidCellCount { columns, rows };
        if columns == 0 || rows == 0 || columns > MAX_CELLS_PER_AXIS || rows > MAX_CELLS_PER_AXIS {
            return Err(invalid);
        }
        let count = columns.checked_mul(rows).ok_or(invalid)?;
        let mut cells = Vec::with_capacity(count);
        cells.resize_with(count, T::default);
        Ok(CellGrid { columns, rows, cells })
    }
}

impl<T> CellGrid<T> {
    /// Number of cells per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells per column.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `(columns, rows)`
    pub fn dims(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// The cell at `(column, row)`. Panics if out of range.
    pub fn get(&self, column: usize, row: usize) -> &T {
        &self.cells[self.index(column, row)]
    }

    pub(crate) fn get_mut(&mut self, column: usize, row: usize) -> &mut T {
        let index = self.index(column, row);
        &mut self.cells[index]
    }

    /// Iterates over `((column, row), cell)` row by row.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| ((index % columns, index / columns), cell))
    }

    pub(crate) fn cells(&self) -> &[T] {
        &self.cells
    }

    fn index(&self, column: usize, row: usize) -> usize {
        assert!(column < self.columns && row < self.rows, "cell ({}, {}) outside of grid", column, row);
        row * self.columns + column
    }
}

impl CellGrid<Cell> {
    /// Number of ids in each cell, row by row.
    pub fn occupancy(&self) -> Vec<usize> {
        self.cells.iter().map(Vec::len).collect()
    }

    pub(crate) fn clear_cells(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    pub(crate) fn remove_id(&mut self, id: ColliderId) {
        for cell in &mut self.cells {
            cell.retain(|&other| other != id);
        }
    }
}

/// Every unordered pair of ids within one cell.
pub(crate) fn cell_pairs(cell: &[ColliderId]) -> impl Iterator<Item = (ColliderId, ColliderId)> + '_ {
    cell.iter()
        .enumerate()
        .flat_map(move |(i, &a)| cell[i + 1..].iter().map(move |&b| (a, b)))
}

/// A uniform grid over a fixed domain.
///
/// Each collider is registered in every cell its box view touches, so a pair
/// sharing several cells is reported once per shared cell.
#[derive(Clone, Debug)]
pub struct UniformGrid {
    domain: Domain,
    cell_size: Vec2,
    cells: CellGrid<Cell>,
}

impl UniformGrid {
    /// Constructs an empty grid with `columns x rows` cells covering `domain`.
    pub fn new(domain: Domain, columns: usize, rows: usize) -> Result<UniformGrid> {
        domain.validate()?;
        let cells = CellGrid::new(columns, rows)?;
        let cell_size = v2(domain.size_x / columns as f64, domain.size_y / rows as f64);
        Ok(UniformGrid { domain, cell_size, cells })
    }

    /// The domain covered by the grid.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Width and height of one cell.
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Read-only view of the cells.
    pub fn grid(&self) -> &CellGrid<Cell> {
        &self.cells
    }

    // cells touched by the bounds, clamped into the grid on both ends
    fn index_bounds<B: BoxView + ?Sized>(&self, bounds: &B) -> IndexRect {
        let to_column = |x: f64| ((x - self.domain.min_x) / self.cell_size.x).floor() as i64;
        let to_row = |y: f64| ((y - self.domain.min_y) / self.cell_size.y).floor() as i64;
        IndexRect::clamped(
            (to_column(bounds.min_x()), to_row(bounds.min_y())),
            (to_column(bounds.max_x()), to_row(bounds.max_y())),
            self.cells.dims(),
        )
    }

    /// Scans the cells on the rayon thread pool.
    #[cfg(feature = "parallel")]
    pub(crate) fn par_find_all_collisions<F>(&self, filter: F) -> Vec<crate::pair::ColliderPair>
    where
        F: Fn(ColliderId, ColliderId) -> bool + Sync,
    {
        use rayon::prelude::*;

        let filter = &filter;
        self.cells
            .cells()
            .par_iter()
            .flat_map_iter(|cell| {
                cell_pairs(cell)
                    .filter(move |&(a, b)| filter(a, b))
                    .map(crate::pair::ColliderPair::from)
            })
            .collect()
    }
}

impl BroadPhase for UniformGrid {
    fn add<C: Collider + ?Sized>(&mut self, id: ColliderId, collider: &C) {
        for (column, row) in self.index_bounds(collider).iter() {
            self.cells.get_mut(column, row).push(id);
        }
    }

    fn remove(&mut self, id: ColliderId) {
        self.cells.remove_id(id);
    }

    fn clear(&mut self) {
        self.cells.clear_cells();
    }

    fn find_all_collisions<S, F>(&mut self, _colliders: &S, mut handler: F)
    where
        S: ColliderSet + ?Sized,
        F: FnMut(ColliderId, ColliderId),
    {
        for cell in self.cells.cells() {
            for (a, b) in cell_pairs(cell) {
                handler(a, b);
            }
        }
    }

    fn is_iterative(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Shape;

    fn unit_grid(resolution: usize) -> UniformGrid {
        UniformGrid::new(Domain::square(0.0, 0.0, 1.0), resolution, resolution).unwrap()
    }

    fn candidates(grid: &mut UniformGrid) -> Vec<(ColliderId, ColliderId)> {
        let none: &[crate::geom::PlacedShape] = &[];
        let mut result = Vec::new();
        grid.find_all_collisions(none, |a, b| result.push((a.min(b), a.max(b))));
        result.sort();
        result
    }

    #[test]
    fn test_cell_grid() {
        let mut grid: CellGrid<Cell> = CellGrid::new(3, 2).unwrap();
        grid.get_mut(2, 1).push(4);
        assert_eq!(grid.dims(), (3, 2));
        assert_eq!(grid.get(2, 1), &vec![4]);
        assert_eq!(grid.occupancy(), vec![0, 0, 0, 0, 0, 1]);
        let coords: Vec<_> = grid.iter().map(|(coord, _)| coord).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        assert!(CellGrid::<Cell>::new(0, 2).is_err());
        assert!(CellGrid::<Cell>::new(MAX_CELLS_PER_AXIS, MAX_CELLS_PER_AXIS).is_ok());
        assert!(CellGrid::<Cell>::new(MAX_CELLS_PER_AXIS + 1, 1).is_err());
        assert!(CellGrid::<Cell>::new(1, usize::MAX).is_err());
    }

    #[test]
    fn test_registration() {
        let mut grid = unit_grid(4);
        // spans the four center cells
        grid.add(0, &Shape::square(0.2).place(v2(0.5, 0.5)));
        assert_eq!(grid.grid().occupancy().iter().sum::<usize>(), 4);
        for &(column, row) in &[(1, 1), (2, 1), (1, 2), (2, 2)] {
            assert_eq!(grid.grid().get(column, row), &vec![0]);
        }
    }

    #[test]
    fn test_out_of_domain_is_clamped() {
        let mut grid = unit_grid(4);
        grid.add(0, &Shape::circle(0.1).place(v2(5.0, 5.0)));
        grid.add(1, &Shape::circle(0.1).place(v2(-3.0, 0.6)));
        assert_eq!(grid.grid().get(3, 3), &vec![0]);
        assert_eq!(grid.grid().get(0, 2), &vec![1]);
        // two colliders far outside the same corner share the corner cell
        grid.add(2, &Shape::circle(0.1).place(v2(9.0, 7.0)));
        assert_eq!(candidates(&mut grid), vec![(0, 2)]);
    }

    #[test]
    fn test_pairs_per_shared_cell() {
        let mut grid = unit_grid(4);
        grid.add(0, &Shape::square(0.2).place(v2(0.5, 0.5)));
        grid.add(1, &Shape::square(0.2).place(v2(0.55, 0.5)));
        grid.add(2, &Shape::circle(0.1).place(v2(0.1, 0.1)));
        // 0 and 1 share four cells
        assert_eq!(candidates(&mut grid), vec![(0, 1); 4]);
        grid.clear();
        assert!(candidates(&mut grid).is_empty());
        assert_eq!(grid.grid().occupancy().iter().sum::<usize>(), 0);
    }

    #[test]
    fn test_remove() {
        let mut grid = unit_grid(2);
        grid.add(0, &Shape::circle(0.1).place(v2(0.2, 0.2)));
        grid.add(1, &Shape::circle(0.1).place(v2(0.25, 0.2)));
        grid.remove(0);
        assert!(candidates(&mut grid).is_empty());
        assert_eq!(grid.grid().get(0, 0), &vec![1]);
    }

    #[test]
    fn test_non_square_domain() {
        let grid = UniformGrid::new(Domain::new(-2.0, 0.0, 4.0, 1.0), 4, 2).unwrap();
        assert_eq!(grid.cell_size(), v2(1.0, 0.5));
        assert!(UniformGrid::new(Domain::new(0.0, 0.0, 0.0, 1.0), 4, 4).is_err());
    }
}
