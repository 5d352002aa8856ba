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

use crate::broad::grid::{cell_pairs, Cell, CellGrid};
use crate::broad::{BroadPhase, Domain};
use crate::collider::{Collider, ColliderId, ColliderSet};
use crate::error::{Error, Result};
use crate::index_rect::{clamp_index, IndexRect};

/// Finest supported level, with `2^MAX_LEVEL` cells per axis.
pub const MAX_LEVEL: u32 = 10;

/// A hierarchy of uniform grids over one domain.
///
/// Level `l` has `2^l x 2^l` cells. Each collider is registered once, by its
/// center, at the finest level whose cells are at least as large as its
/// bounding circle's diameter. Colliders too large for the coarsest level are
/// kept there anyway and widen the neighborhood scanned at that level.
#[derive(Clone, Debug)]
pub struct MultiGrid {
    min_level: u32,
    max_level: u32,
    domain: Domain,
    // levels[0] is min_level
    levels: Vec<CellGrid<Cell>>,
    // largest radius registered at min_level since the last clear
    coarse_radius: f64,
}

impl MultiGrid {
    /// Constructs an empty hierarchy with the levels `min_level..=max_level`.
    pub fn new(min_level: u32, max_level: u32, domain: Domain) -> Result<MultiGrid> {
        domain.validate()?;
        if min_level > max_level || max_level > MAX_LEVEL {
            return Err(Error::InvalidLevels { min_level, max_level });
        }
        let levels = (min_level..=max_level)
            .map(|level| CellGrid::new(1 << level, 1 << level))
            .collect::<Result<Vec<_>>>()?;
        Ok(MultiGrid { min_level, max_level, domain, levels, coarse_radius: 0.0 })
    }

    /// The coarsest level.
    pub fn min_level(&self) -> u32 {
        self.min_level
    }

    /// The finest level.
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// The domain covered by every level.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// The grid of one level. Panics if `level` is out of range.
    pub fn level(&self, level: u32) -> &CellGrid<Cell> {
        assert!(
            level >= self.min_level && level <= self.max_level,
            "level {} outside of {}..={}",
            level,
            self.min_level,
            self.max_level
        );
        &self.levels[(level - self.min_level) as usize]
    }

    /// All levels, coarsest first.
    pub fn grids(&self) -> impl Iterator<Item = &CellGrid<Cell>> + '_ {
        self.levels.iter()
    }

    /// The smaller side of one cell at `level`.
    pub fn cell_size(&self, level: u32) -> f64 {
        let count = (1u64 << level) as f64;
        (self.domain.size_x / count).min(self.domain.size_y / count)
    }

    /// The level a collider with the given bounding radius is registered at.
    pub fn level_for_radius(&self, radius: f64) -> u32 {
        (self.min_level + 1..=self.max_level)
            .rev()
            .find(|&level| 2.0 * radius <= self.cell_size(level))
            .unwrap_or(self.min_level)
    }

    // (column, row) of the cell containing a point, clamped into the grid.
    // Scaling by the power-of-two count is exact, so `column >> shift` is the
    // column of the same point at a coarser level.
    fn cell_of(&self, level: u32, x: f64, y: f64) -> (usize, usize) {
        let count = 1usize << level;
        let column = ((x - self.domain.min_x) / self.domain.size_x * count as f64).floor() as i64;
        let row = ((y - self.domain.min_y) / self.domain.size_y * count as f64).floor() as i64;
        (clamp_index(column, count), clamp_index(row, count))
    }

    // neighborhood radius in cells needed at `level` so that no overlap is missed
    fn reach(&self, level: u32) -> usize {
        if level != self.min_level {
            return 1;
        }
        let cells = (2.0 * self.coarse_radius / self.cell_size(level)).ceil();
        if cells > 1.0 {
            // beyond the grid size every cell is reached anyway
            (cells as usize).min(1 << level)
        } else {
            1
        }
    }

    /// Reports every candidate pair involving the collider in `cell` at
    /// `(column, row)` of `level`: pairs inside the cell, pairs with the
    /// forward half of the same-level neighborhood, and pairs with the
    /// enclosing neighborhoods of all coarser levels.
    fn check_cell<F>(&self, level: u32, (column, row): (usize, usize), handler: &mut F)
    where
        F: FnMut(ColliderId, ColliderId),
    {
        let grid = self.level(level);
        let cell = grid.get(column, row);
        if cell.is_empty() {
            return;
        }
        for (a, b) in cell_pairs(cell) {
            handler(a, b);
        }

        // each unordered pair of distinct neighboring cells is visited from exactly one side
        let reach = self.reach(level) as i64;
        let (columns, rows) = (grid.columns() as i64, grid.rows() as i64);
        for dy in 0..=reach {
            for dx in -reach..=reach {
                if dy == 0 && dx <= 0 {
                    continue;
                }
                let (nx, ny) = (column as i64 + dx, row as i64 + dy);
                if nx < 0 || nx >= columns || ny >= rows {
                    continue;
                }
                let neighbor = grid.get(nx as usize, ny as usize);
                for &a in cell {
                    for &b in neighbor {
                        handler(a, b);
                    }
                }
            }
        }

        for coarse_level in (self.min_level..level).rev() {
            let shift = level - coarse_level;
            let coarse = self.level(coarse_level);
            let center = (column >> shift, row >> shift);
            let rect = IndexRect::around(center, self.reach(coarse_level), coarse.dims());
            for (coarse_column, coarse_row) in rect.iter() {
                for &a in cell {
                    for &b in coarse.get(coarse_column, coarse_row) {
                        handler(a, b);
                    }
                }
            }
        }
    }

    fn cell_coords(&self) -> impl Iterator<Item = (u32, (usize, usize))> + '_ {
        (self.min_level..=self.max_level).rev().flat_map(move |level| {
            let count = 1usize << level;
            (0..count * count).map(move |index| (level, (index % count, index / count)))
        })
    }

    /// Checks the cells on the rayon thread pool.
    #[cfg(feature = "parallel")]
    pub(crate) fn par_find_all_collisions<F>(&self, filter: F) -> Vec<crate::pair::ColliderPair>
    where
        F: Fn(ColliderId, ColliderId) -> bool + Sync,
    {
        use rayon::prelude::*;

        let coords: Vec<_> = self.cell_coords().collect();
        coords
            .par_iter()
            .fold(Vec::new, |mut pairs, &(level, coord)| {
                self.check_cell(level, coord, &mut |a, b| {
                    if filter(a, b) {
                        pairs.push(crate::pair::ColliderPair::new(a, b));
                    }
                });
                pairs
            })
            .reduce(Vec::new, |mut pairs, other| {
                pairs.extend(other);
                pairs
            })
    }
}

impl BroadPhase for MultiGrid {
    fn add<C: Collider + ?Sized>(&mut self, id: ColliderId, collider: &C) {
        let radius = collider.radius();
        let level = self.level_for_radius(radius);
        if level == self.min_level {
            self.coarse_radius = self.coarse_radius.max(radius);
        }
        let (column, row) = self.cell_of(level, collider.center_x(), collider.center_y());
        let index = (level - self.min_level) as usize;
        self.levels[index].get_mut(column, row).push(id);
    }

    fn remove(&mut self, id: ColliderId) {
        for grid in &mut self.levels {
            grid.remove_id(id);
        }
    }

    fn clear(&mut self) {
        for grid in &mut self.levels {
            grid.clear_cells();
        }
        self.coarse_radius = 0.0;
    }

    fn find_all_collisions<S, F>(&mut self, _colliders: &S, mut handler: F)
    where
        S: ColliderSet + ?Sized,
        F: FnMut(ColliderId, ColliderId),
    {
        for (level, coord) in self.cell_coords() {
            self.check_cell(level, coord, &mut handler);
        }
    }

    fn is_iterative(&self) -> bool {
        false
    }
}
