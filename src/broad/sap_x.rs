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

use fnv::FnvHashSet;

use crate::broad::sweep::{self, Axis, Endpoint, Side};
use crate::broad::BroadPhase;
use crate::collider::{Collider, ColliderId, ColliderSet};

/// Sweep-and-prune along the x axis, with a y overlap check on each candidate.
///
/// The endpoint list persists across queries and is re-sorted with an
/// insertion sort, which is fast while colliders move little between queries.
#[derive(Clone, Debug, Default)]
pub struct SweepAndPruneX {
    bounds: Vec<Endpoint>,
    active: FnvHashSet<ColliderId>,
}

impl SweepAndPruneX {
    /// Constructs an empty instance.
    pub fn new() -> SweepAndPruneX {
        SweepAndPruneX::default()
    }

    /// Number of registered colliders.
    pub fn len(&self) -> usize {
        self.bounds.len() / 2
    }

    /// Returns `true` if no collider is registered.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl BroadPhase for SweepAndPruneX {
    fn add<C: Collider + ?Sized>(&mut self, id: ColliderId, collider: &C) {
        for endpoint in sweep::endpoints(id, Axis::X, collider) {
            sweep::insert_sorted(&mut self.bounds, endpoint);
        }
    }

    fn remove(&mut self, id: ColliderId) {
        self.bounds.retain(|endpoint| endpoint.id != id);
    }

    fn clear(&mut self) {
        self.bounds.clear();
        self.active.clear();
    }

    fn find_all_collisions<S, F>(&mut self, colliders: &S, mut handler: F)
    where
        S: ColliderSet + ?Sized,
        F: FnMut(ColliderId, ColliderId),
    {
        let SweepAndPruneX { bounds, active } = self;
        sweep::refresh(bounds, Axis::X, colliders);
        sweep::insertion_sort(bounds, |_, _| ());

        active.clear();
        for endpoint in bounds.iter() {
            match endpoint.side {
                Side::Lower => {
                    active.insert(endpoint.id);
                }
                Side::Upper => {
                    active.remove(&endpoint.id);
                    let collider = colliders.get(endpoint.id);
                    for &other in active.iter() {
                        if Axis::Y.touches(collider, colliders.get(other)) {
                            handler(endpoint.id, other);
                        }
                    }
                }
            }
        }
        debug_assert!(active.is_empty());
    }

    fn is_iterative(&self) -> bool {
        true
    }
}
