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

use thiserror::Error;

/// Invalid arguments rejected when constructing a broad-phase structure.
///
/// Queries never fail once construction has succeeded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The domain must have a positive, finite size on both axes.
    #[error("domain size must be positive, got {size_x} x {size_y}")]
    InvalidDomainSize {
        /// Requested width.
        size_x: f64,
        /// Requested height.
        size_y: f64,
    },

    /// Grids need at least one cell per axis.
    #[error("cell count must be positive, got {columns} x {rows}")]
    InvalidCellCount {
        /// Requested number of columns.
        columns: usize,
        /// Requested number of rows.
        rows: usize,
    },

    /// Multi-resolution levels must satisfy `min_level <= max_level <= MAX_LEVEL`.
    #[error("invalid grid levels {min_level}..={max_level}")]
    InvalidLevels {
        /// Requested coarsest level.
        min_level: u32,
        /// Requested finest level.
        max_level: u32,
    },

    /// The algorithm tag does not name any known algorithm.
    #[error("collision method {0:?} unknown")]
    UnknownAlgorithm(String),
}

/// Shorthand for results with this crate's `Error`.
pub type Result<T> = std::result::Result<T, Error>;
