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

//! Interchangeable broad-phase collision detection for 2D circles and
//! axis-aligned rectangles.
//!
//! A broad phase produces candidate pairs cheaply; every candidate is then
//! confirmed with an exact test. Five algorithms share the `BroadPhase`
//! interface: brute force, a uniform grid, a multi-resolution grid,
//! sweep-and-prune on the x axis, and a persistent two-axis sweep-and-prune.
//! `CollisionDetection` runs the selected one and returns the set of colliding
//! pairs.
//!
//! ```
//! use collider_broadphase::geom::{v2, Shape};
//! use collider_broadphase::{AlgorithmKind, ColliderPair, CollisionDetection, Config};
//!
//! let shapes = vec![
//!     Shape::circle(0.2).place(v2(0.0, 0.0)),
//!     Shape::circle(0.2).place(v2(0.1, 0.0)),
//!     Shape::square(0.2).place(v2(0.8, 0.8)),
//! ];
//! let config = Config { algorithm: AlgorithmKind::SapX, ..Config::default() };
//! let mut detection = CollisionDetection::new(config, &shapes)?;
//! let collisions = detection.find_collisions(&shapes);
//! assert_eq!(collisions.len(), 1);
//! assert!(collisions.contains(&ColliderPair::new(0, 1)));
//! # Ok::<(), collider_broadphase::Error>(())
//! ```

#![warn(missing_docs)]

pub mod exact;
pub mod geom;

mod broad;
mod collider;
mod detection;
mod error;
mod float;
mod index_rect;
mod pair;
mod util;


pub use crate::broad::*;
pub use crate::collider::*;
pub use crate::detection::*;
pub use crate::error::{Error, Result};
pub use crate::pair::*;
