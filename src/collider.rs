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

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::geom::{v2, ShapeKind, Vec2};

/// Identity of a collider within a `ColliderSet`.
///
/// Two colliders with identical geometry are still distinct if their ids differ.
/// Pairs are canonicalized by ordering ids.
pub type ColliderId = usize;

/// Axis-aligned bounding box view of a collider.
///
/// Implementations must satisfy `min_x() <= max_x()` and `min_y() <= max_y()`.
pub trait BoxView {
    /// Lowest x coordinate.
    fn min_x(&self) -> f64;
    /// Highest x coordinate.
    fn max_x(&self) -> f64;
    /// Lowest y coordinate.
    fn min_y(&self) -> f64;
    /// Highest y coordinate.
    fn max_y(&self) -> f64;
}

/// Circle view of a collider. `radius()` must be non-negative.
pub trait CircleView {
    /// X coordinate of the center.
    fn center_x(&self) -> f64;
    /// Y coordinate of the center.
    fn center_y(&self) -> f64;
    /// Radius of the circle.
    fn radius(&self) -> f64;

    /// Center of the circle as a vector.
    fn center(&self) -> Vec2 {
        v2(self.center_x(), self.center_y())
    }
}

/// An object that the broad phase can index: both views must describe the
/// same object at the same instant, with the box view enclosing the circle view
/// for circles and the circle view enclosing the box view for rects.
pub trait Collider: BoxView + CircleView {
    /// The exact shape used for the narrow-phase test.
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }
}

/// A plain axis-aligned box.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Bounds {
    /// Lowest x coordinate.
    pub min_x: f64,
    /// Highest x coordinate.
    pub max_x: f64,
    /// Lowest y coordinate.
    pub min_y: f64,
    /// Highest y coordinate.
    pub max_y: f64,
}

impl Bounds {
    /// The box view derived from a circle: center +/- radius on each axis.
    pub fn of_circle<C: CircleView + ?Sized>(circle: &C) -> Bounds {
        let radius = circle.radius();
        Bounds {
            min_x: circle.center_x() - radius,
            max_x: circle.center_x() + radius,
            min_y: circle.center_y() - radius,
            max_y: circle.center_y() + radius,
        }
    }
}

impl BoxView for Bounds {
    fn min_x(&self) -> f64 { self.min_x }
    fn max_x(&self) -> f64 { self.max_x }
    fn min_y(&self) -> f64 { self.min_y }
    fn max_y(&self) -> f64 { self.max_y }
}

/// Provides the current live colliders for one query.
///
/// The set must not change between seeding an iterative algorithm and querying
/// it, except through the algorithm's own `add`/`remove`/`clear`. `get` may panic
/// on an id that is not live.
pub trait ColliderSet {
    /// The collider type stored in the set.
    type Collider: Collider;

    /// Returns the collider with the given id.
    fn get(&self, id: ColliderId) -> &Self::Collider;

    /// Iterates over the ids of all live colliders.
    fn ids(&self) -> impl Iterator<Item = ColliderId> + '_;

    /// Number of live colliders.
    fn len(&self) -> usize;

    /// Returns `true` if there are no live colliders.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: Collider> ColliderSet for [C] {
    type Collider = C;

    fn get(&self, id: ColliderId) -> &C {
        &self[id]
    }

    fn ids(&self) -> impl Iterator<Item = ColliderId> + '_ {
        0..self.len()
    }

    fn len(&self) -> usize {
        <[C]>::len(self)
    }
}

impl<C: Collider> ColliderSet for Vec<C> {
    type Collider = C;

    fn get(&self, id: ColliderId) -> &C {
        &self[id]
    }

    fn ids(&self) -> impl Iterator<Item = ColliderId> + '_ {
        0..self.len()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<C: Collider, S: BuildHasher> ColliderSet for HashMap<ColliderId, C, S> {
    type Collider = C;

    fn get(&self, id: ColliderId) -> &C {
        self.get(&id)
            .unwrap_or_else(|| panic!("collider id {} is not live", id))
    }

    fn ids(&self) -> impl Iterator<Item = ColliderId> + '_ {
        self.keys().copied()
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl<C: Collider> ColliderSet for BTreeMap<ColliderId, C> {
    type Collider = C;

    fn get(&self, id: ColliderId) -> &C {
        self.get(&id)
            .unwrap_or_else(|| panic!("collider id {} is not live", id))
    }

    fn ids(&self) -> impl Iterator<Item = ColliderId> + '_ {
        self.keys().copied()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}
