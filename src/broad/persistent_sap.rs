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
use log::debug;

use crate::broad::sweep::{self, Axis, Endpoint, Side};
use crate::broad::BroadPhase;
use crate::collider::{Collider, ColliderId, ColliderSet};
use crate::pair::ColliderPair;

/// Number of colliders added since the last query above which the overlap set
/// is rebuilt from scratch.
pub const DEFAULT_REBUILD_THRESHOLD: usize = 1000;

/// Sweep-and-prune on both axes with a persistent overlap set.
///
/// Between queries the overlap set is patched from the swaps performed while
/// re-sorting the endpoint lists, so a query costs little when colliders move
/// little. After a large batch of additions the set is rebuilt instead.
///
/// A pair is in the set if and only if the boxes of both colliders overlap or
/// touch on both axes.
#[derive(Clone, Debug)]
pub struct PersistentSweepAndPrune {
    bounds_x: Vec<Endpoint>,
    bounds_y: Vec<Endpoint>,
    overlaps: FnvHashSet<ColliderPair>,
    newly_added: usize,
    rebuild_threshold: usize,
}

impl Default for PersistentSweepAndPrune {
    fn default() -> PersistentSweepAndPrune {
        PersistentSweepAndPrune::new()
    }
}

impl PersistentSweepAndPrune {
    /// Constructs an empty instance with `DEFAULT_REBUILD_THRESHOLD`.
    pub fn new() -> PersistentSweepAndPrune {
        PersistentSweepAndPrune {
            bounds_x: Vec::new(),
            bounds_y: Vec::new(),
            overlaps: FnvHashSet::default(),
            newly_added: 0,
            rebuild_threshold: DEFAULT_REBUILD_THRESHOLD,
        }
    }

    /// Sets the number of additions between queries above which the next
    /// query rebuilds the overlap set.
    pub fn with_rebuild_threshold(mut self, rebuild_threshold: usize) -> PersistentSweepAndPrune {
        self.rebuild_threshold = rebuild_threshold;
        self
    }

    /// See `with_rebuild_threshold`.
    pub fn rebuild_threshold(&self) -> usize {
        self.rebuild_threshold
    }

    /// Number of pairs in the overlap set as of the last query.
    pub fn overlap_count(&self) -> usize {
        self.overlaps.len()
    }

    /// Number of registered colliders.
    pub fn len(&self) -> usize {
        self.bounds_x.len() / 2
    }

    /// Returns `true` if no collider is registered.
    pub fn is_empty(&self) -> bool {
        self.bounds_x.is_empty()
    }

    /// Forces the next query to take the rebuild path.
    pub fn invalidate(&mut self) {
        self.newly_added = usize::MAX;
    }

    fn rebuild<S: ColliderSet + ?Sized>(&mut self, colliders: &S) {
        debug!(
            "rebuilding persistent sweep-and-prune ({} colliders, {} added)",
            self.len(),
            self.newly_added
        );
        self.overlaps.clear();
        rebuild_axis(&mut self.bounds_x, Axis::Y, colliders, &mut self.overlaps);
        rebuild_axis(&mut self.bounds_y, Axis::X, colliders, &mut self.overlaps);
    }
}

// general sort, then a sweep confirming each overlap on the other axis
fn rebuild_axis<S: ColliderSet + ?Sized>(
    bounds: &mut [Endpoint],
    other: Axis,
    colliders: &S,
    overlaps: &mut FnvHashSet<ColliderPair>,
) {
    bounds.sort_unstable_by_key(Endpoint::key);
    let mut active: FnvHashSet<ColliderId> = FnvHashSet::default();
    for endpoint in bounds.iter() {
        match endpoint.side {
            Side::Lower => {
                let collider = colliders.get(endpoint.id);
                for &id in active.iter() {
                    if other.touches(collider, colliders.get(id)) {
                        overlaps.insert(ColliderPair::new(endpoint.id, id));
                    }
                }
                active.insert(endpoint.id);
            }
            Side::Upper => {
                active.remove(&endpoint.id);
            }
        }
    }
}

// insertion sort, patching the overlap set at every lower/upper crossing
fn update_axis<S: ColliderSet + ?Sized>(
    bounds: &mut [Endpoint],
    other: Axis,
    colliders: &S,
    overlaps: &mut FnvHashSet<ColliderPair>,
) {
    sweep::insertion_sort(bounds, |moving, passed| {
        if moving.id == passed.id {
            return;
        }
        match (moving.side, passed.side) {
            // the moving interval now starts before the passed one ends
            (Side::Lower, Side::Upper) => {
                if other.touches(colliders.get(moving.id), colliders.get(passed.id)) {
                    overlaps.insert(ColliderPair::new(moving.id, passed.id));
                }
            }
            // the moving interval now ends before the passed one starts
            (Side::Upper, Side::Lower) => {
                overlaps.remove(&ColliderPair::new(moving.id, passed.id));
            }
            _ => (),
        }
    });
}

impl BroadPhase for PersistentSweepAndPrune {
    // Appended endpoints come after every other endpoint in list order, which
    // matches the new collider being absent from the overlap set. The next
    // query sorts them in and records the crossings.
    fn add<C: Collider + ?Sized>(&mut self, id: ColliderId, collider: &C) {
        self.bounds_x.extend(sweep::endpoints(id, Axis::X, collider));
        self.bounds_y.extend(sweep::endpoints(id, Axis::Y, collider));
        self.newly_added = self.newly_added.saturating_add(1);
    }

    fn remove(&mut self, id: ColliderId) {
        self.bounds_x.retain(|endpoint| endpoint.id != id);
        self.bounds_y.retain(|endpoint| endpoint.id != id);
        self.overlaps.retain(|pair| !pair.contains(id));
    }

    fn clear(&mut self) {
        self.bounds_x.clear();
        self.bounds_y.clear();
        self.overlaps.clear();
        self.newly_added = 0;
    }

    fn find_all_collisions<S, F>(&mut self, colliders: &S, mut handler: F)
    where
        S: ColliderSet + ?Sized,
        F: FnMut(ColliderId, ColliderId),
    {
        sweep::refresh(&mut self.bounds_x, Axis::X, colliders);
        sweep::refresh(&mut self.bounds_y, Axis::Y, colliders);
        if self.newly_added > self.rebuild_threshold {
            self.rebuild(colliders);
        } else {
            update_axis(&mut self.bounds_x, Axis::Y, colliders, &mut self.overlaps);
            update_axis(&mut self.bounds_y, Axis::X, colliders, &mut self.overlaps);
        }
        self.newly_added = 0;

        for pair in self.overlaps.iter() {
            handler(pair.first(), pair.second());
        }
    }

    fn is_iterative(&self) -> bool {
        true
    }
}
