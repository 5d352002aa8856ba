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

use crate::broad::BroadPhase;
use crate::collider::{Collider, ColliderId, ColliderSet};

/// Reports every pair of registered colliders exactly once.
///
/// Used as the reference result for the other algorithms.
#[derive(Clone, Debug, Default)]
pub struct BruteForce {
    ids: Vec<ColliderId>,
}

impl BruteForce {
    /// Constructs an empty instance.
    pub fn new() -> BruteForce {
        BruteForce { ids: Vec::new() }
    }

    /// Number of registered colliders.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no collider is registered.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl BroadPhase for BruteForce {
    fn add<C: Collider + ?Sized>(&mut self, id: ColliderId, _collider: &C) {
        self.ids.push(id);
    }

    fn remove(&mut self, id: ColliderId) {
        self.ids.retain(|&other| other != id);
    }

    fn clear(&mut self) {
        self.ids.clear();
    }

    fn find_all_collisions<S, F>(&mut self, _colliders: &S, mut handler: F)
    where
        S: ColliderSet + ?Sized,
        F: FnMut(ColliderId, ColliderId),
    {
        for (i, &a) in self.ids.iter().enumerate() {
            for &b in &self.ids[i + 1..] {
                handler(a, b);
            }
        }
    }

    fn is_iterative(&self) -> bool {
        true
    }
}
