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

//! Broad-phase algorithms.
//!
//! Every algorithm reports *candidate* pairs: pairs whose bounding proxies may
//! overlap. Some algorithms report a pair more than once, so callers must
//! deduplicate (see `ColliderPair`) and apply an exact test.

mod brute_force;
mod grid;
mod multi_grid;
mod persistent_sap;
mod sap_x;
mod sweep;

use std::fmt;
use std::str::FromStr;

use crate::collider::{Collider, ColliderId, ColliderSet};
use crate::error::{Error, Result};
use crate::util::ceil_log2;

pub use self::brute_force::BruteForce;
pub use self::grid::{Cell, CellGrid, UniformGrid, MAX_CELLS_PER_AXIS};
pub use self::multi_grid::{MultiGrid, MAX_LEVEL};
pub use self::persistent_sap::{PersistentSweepAndPrune, DEFAULT_REBUILD_THRESHOLD};
pub use self::sap_x::SweepAndPruneX;

/// The capability set shared by all broad-phase algorithms.
///
/// Non-iterative algorithms (`is_iterative() == false`) are rebuilt before every
/// query with `clear` followed by one `add` per live collider. Iterative
/// algorithms keep their index across queries: every live collider must be
/// added exactly once, and every collider leaving the live set must be passed
/// to `remove` (or the whole index dropped with `clear`). This is not checked;
/// breaking it yields stale or missing pairs.
pub trait BroadPhase {
    /// Registers a collider under `id`.
    fn add<C: Collider + ?Sized>(&mut self, id: ColliderId, collider: &C);

    /// Drops a collider from the index.
    fn remove(&mut self, id: ColliderId);

    /// Drops all index state.
    fn clear(&mut self);

    /// Calls `handler(a, b)` for every candidate pair, reading current geometry
    /// from `colliders`. Pair order is unspecified and `a != b`.
    fn find_all_collisions<S, F>(&mut self, colliders: &S, handler: F)
    where
        S: ColliderSet + ?Sized,
        F: FnMut(ColliderId, ColliderId);

    /// Returns `true` if the index persists across queries.
    fn is_iterative(&self) -> bool;
}

/// The region covered by grid-based algorithms.
///
/// Colliders outside of the domain are still handled; they are clamped into
/// the edge cells.
#[derive(PartialEq, Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    /// Lowest x coordinate.
    pub min_x: f64,
    /// Lowest y coordinate.
    pub min_y: f64,
    /// Width.
    pub size_x: f64,
    /// Height.
    pub size_y: f64,
}

impl Domain {
    /// Constructs a domain from its origin and size.
    pub fn new(min_x: f64, min_y: f64, size_x: f64, size_y: f64) -> Domain {
        Domain { min_x, min_y, size_x, size_y }
    }

    /// Constructs a square domain.
    pub fn square(min_x: f64, min_y: f64, size: f64) -> Domain {
        Domain::new(min_x, min_y, size, size)
    }

    /// Checks that the domain has a positive, finite size.
    pub fn validate(&self) -> Result<()> {
        let valid = |size: f64| size > 0.0 && size.is_finite();
        if valid(self.size_x) && valid(self.size_y) && self.min_x.is_finite() && self.min_y.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidDomainSize { size_x: self.size_x, size_y: self.size_y })
        }
    }
}

impl Default for Domain {
    // [-1, -1]..[1, 1]
    fn default() -> Domain {
        Domain::square(-1.0, -1.0, 2.0)
    }
}

/// Tags of the available algorithms.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmKind {
    /// O(n^2) reference.
    BruteForce,
    /// Uniform grid.
    Grid,
    /// Multi-resolution grid.
    MultiGrid,
    /// Sweep-and-prune on the x axis.
    SapX,
    /// Persistent sweep-and-prune on both axes.
    PersistentSap,
}

impl AlgorithmKind {
    /// All algorithm tags.
    pub const ALL: [AlgorithmKind; 5] = [
        AlgorithmKind::BruteForce,
        AlgorithmKind::Grid,
        AlgorithmKind::MultiGrid,
        AlgorithmKind::SapX,
        AlgorithmKind::PersistentSap,
    ];

    /// Returns `true` if this algorithm keeps its index across queries.
    pub fn is_iterative(self) -> bool {
        match self {
            AlgorithmKind::BruteForce | AlgorithmKind::SapX | AlgorithmKind::PersistentSap => true,
            AlgorithmKind::Grid | AlgorithmKind::MultiGrid => false,
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlgorithmKind::BruteForce => "BruteForce",
            AlgorithmKind::Grid => "Grid",
            AlgorithmKind::MultiGrid => "MultiGrid",
            AlgorithmKind::SapX => "SAP_X",
            AlgorithmKind::PersistentSap => "PersistentSAP",
        })
    }
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<AlgorithmKind> {
        let normalized: String = tag
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "bruteforce" => Ok(AlgorithmKind::BruteForce),
            "grid" => Ok(AlgorithmKind::Grid),
            "multigrid" => Ok(AlgorithmKind::MultiGrid),
            "sapx" => Ok(AlgorithmKind::SapX),
            "persistentsap" => Ok(AlgorithmKind::PersistentSap),
            _ => Err(Error::UnknownAlgorithm(tag.to_string())),
        }
    }
}

/// One of the five algorithms, chosen at runtime.
pub enum Algorithm {
    /// See `BruteForce`.
    BruteForce(BruteForce),
    /// See `UniformGrid`.
    Grid(UniformGrid),
    /// See `MultiGrid`.
    MultiGrid(MultiGrid),
    /// See `SweepAndPruneX`.
    SapX(SweepAndPruneX),
    /// See `PersistentSweepAndPrune`.
    PersistentSap(PersistentSweepAndPrune),
}

impl Algorithm {
    /// Constructs an empty algorithm of the given kind.
    ///
    /// `resolution` is the cell count per axis of `Grid`, at most
    /// `MAX_CELLS_PER_AXIS`; `MultiGrid` uses the
    /// levels `[level - 1, level]` with `level = ceil(log2(resolution))`. The
    /// other algorithms ignore it.
    pub fn new(kind: AlgorithmKind, resolution: usize, domain: Domain) -> Result<Algorithm> {
        Ok(match kind {
            AlgorithmKind::BruteForce => Algorithm::BruteForce(BruteForce::new()),
            AlgorithmKind::Grid => {
                Algorithm::Grid(UniformGrid::new(domain, resolution, resolution)?)
            }
            AlgorithmKind::MultiGrid => {
                if resolution == 0 {
                    return Err(Error::InvalidCellCount { columns: resolution, rows: resolution });
                }
                let level = ceil_log2(u32::try_from(resolution).unwrap_or(u32::MAX));
                Algorithm::MultiGrid(MultiGrid::new(level.saturating_sub(1), level, domain)?)
            }
            AlgorithmKind::SapX => Algorithm::SapX(SweepAndPruneX::new()),
            AlgorithmKind::PersistentSap => Algorithm::PersistentSap(PersistentSweepAndPrune::new()),
        })
    }

    /// The tag of this algorithm.
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Algorithm::BruteForce(_) => AlgorithmKind::BruteForce,
            Algorithm::Grid(_) => AlgorithmKind::Grid,
            Algorithm::MultiGrid(_) => AlgorithmKind::MultiGrid,
            Algorithm::SapX(_) => AlgorithmKind::SapX,
            Algorithm::PersistentSap(_) => AlgorithmKind::PersistentSap,
        }
    }

    /// Read-only view of the occupied cells, one grid per level, finest last.
    /// Empty for algorithms without grids.
    pub fn grids(&self) -> Vec<&CellGrid<Cell>> {
        match self {
            Algorithm::Grid(grid) => vec![grid.grid()],
            Algorithm::MultiGrid(multi_grid) => multi_grid.grids().collect(),
            _ => Vec::new(),
        }
    }

    /// Scans grid cells on the rayon thread pool, keeping the candidate pairs
    /// accepted by `filter`. Returns `None` for the sequential algorithms.
    #[cfg(feature = "parallel")]
    pub fn par_find_all_collisions<F>(&self, filter: F) -> Option<Vec<crate::pair::ColliderPair>>
    where
        F: Fn(ColliderId, ColliderId) -> bool + Sync,
    {
        match self {
            Algorithm::Grid(grid) => Some(grid.par_find_all_collisions(filter)),
            Algorithm::MultiGrid(multi_grid) => Some(multi_grid.par_find_all_collisions(filter)),
            _ => None,
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Algorithm::BruteForce($inner) => $body,
            Algorithm::Grid($inner) => $body,
            Algorithm::MultiGrid($inner) => $body,
            Algorithm::SapX($inner) => $body,
            Algorithm::PersistentSap($inner) => $body,
        }
    };
}

impl BroadPhase for Algorithm {
    fn add<C: Collider + ?Sized>(&mut self, id: ColliderId, collider: &C) {
        dispatch!(self, inner => inner.add(id, collider))
    }

    fn remove(&mut self, id: ColliderId) {
        dispatch!(self, inner => inner.remove(id))
    }

    fn clear(&mut self) {
        dispatch!(self, inner => inner.clear())
    }

    fn find_all_collisions<S, F>(&mut self, colliders: &S, handler: F)
    where
        S: ColliderSet + ?Sized,
        F: FnMut(ColliderId, ColliderId),
    {
        dispatch!(self, inner => inner.find_all_collisions(colliders, handler))
    }

    fn is_iterative(&self) -> bool {
        dispatch!(self, inner => inner.is_iterative())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        for kind in AlgorithmKind::ALL.iter() {
            assert_eq!(kind.to_string().parse::<AlgorithmKind>(), Ok(*kind));
        }
        assert_eq!("sap-x".parse::<AlgorithmKind>(), Ok(AlgorithmKind::SapX));
        assert_eq!("persistent_sap".parse::<AlgorithmKind>(), Ok(AlgorithmKind::PersistentSap));
        assert_eq!(
            "QuadTree".parse::<AlgorithmKind>(),
            Err(Error::UnknownAlgorithm("QuadTree".to_string()))
        );
    }

    #[test]
    fn test_new_algorithms() {
        for &kind in AlgorithmKind::ALL.iter() {
            let algorithm = Algorithm::new(kind, 8, Domain::default()).unwrap();
            assert_eq!(algorithm.kind(), kind);
            assert_eq!(algorithm.is_iterative(), kind.is_iterative());
        }
    }

    #[test]
    fn test_resolution_to_levels() {
        match Algorithm::new(AlgorithmKind::MultiGrid, 8, Domain::default()).unwrap() {
            Algorithm::MultiGrid(multi_grid) => {
                assert_eq!(multi_grid.min_level(), 2);
                assert_eq!(multi_grid.max_level(), 3);
            }
            _ => panic!("expected a multi-resolution grid"),
        }
        match Algorithm::new(AlgorithmKind::MultiGrid, 1, Domain::default()).unwrap() {
            Algorithm::MultiGrid(multi_grid) => {
                assert_eq!(multi_grid.min_level(), 0);
                assert_eq!(multi_grid.max_level(), 0);
            }
            _ => panic!("expected a multi-resolution grid"),
        }
        let algorithm = Algorithm::new(AlgorithmKind::Grid, 4, Domain::default()).unwrap();
        let grids = algorithm.grids();
        assert_eq!(grids.len(), 1);
        assert_eq!((grids[0].columns(), grids[0].rows()), (4, 4));
        assert!(Algorithm::new(AlgorithmKind::SapX, 4, Domain::default()).unwrap().grids().is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            Algorithm::new(AlgorithmKind::Grid, 0, Domain::default()).err(),
            Some(Error::InvalidCellCount { columns: 0, rows: 0 })
        );
        assert_eq!(
            Algorithm::new(AlgorithmKind::MultiGrid, 0, Domain::default()).err(),
            Some(Error::InvalidCellCount { columns: 0, rows: 0 })
        );
        assert_eq!(
            Algorithm::new(AlgorithmKind::Grid, 4, Domain::square(0.0, 0.0, 0.0)).err(),
            Some(Error::InvalidDomainSize { size_x: 0.0, size_y: 0.0 })
        );
        assert!(Algorithm::new(AlgorithmKind::MultiGrid, 4, Domain::new(0.0, 0.0, 1.0, -1.0)).is_err());
        assert!(Algorithm::new(AlgorithmKind::MultiGrid, 1 << 20, Domain::default()).is_err());
        assert_eq!(
            Algorithm::new(AlgorithmKind::Grid, usize::MAX, Domain::default()).err(),
            Some(Error::InvalidCellCount { columns: usize::MAX, rows: usize::MAX })
        );
        assert!(Algorithm::new(AlgorithmKind::Grid, 100_000, Domain::default()).is_err());
        assert!(Algorithm::new(AlgorithmKind::Grid, MAX_CELLS_PER_AXIS, Domain::default()).is_ok());
        // algorithms without a grid do not care about the resolution
        assert!(Algorithm::new(AlgorithmKind::BruteForce, 0, Domain::square(0.0, 0.0, 0.0)).is_ok());
    }

    #[test]
    fn test_domain_validate() {
        assert!(Domain::default().validate().is_ok());
        assert!(Domain::square(0.0, 0.0, f64::NAN).validate().is_err());
        assert!(Domain::square(0.0, 0.0, f64::INFINITY).validate().is_err());
        assert!(Domain::square(f64::NAN, 0.0, 1.0).validate().is_err());
    }
}
