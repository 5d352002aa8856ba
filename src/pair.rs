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

use std::fmt;

use fnv::FnvHashSet;

use crate::collider::ColliderId;

/// An unordered pair of distinct colliders, stored in canonical order.
///
/// `ColliderPair::new(a, b) == ColliderPair::new(b, a)`, so a pair reported
/// from two different paths collapses to one set element.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ColliderPair {
    first: ColliderId,
    second: ColliderId,
}

impl ColliderPair {
    /// Constructs the canonical pair of `a` and `b`. Panics if `a == b`.
    pub fn new(a: ColliderId, b: ColliderId) -> ColliderPair {
        assert!(a != b, "ids must be different: {} {}", a, b);
        if a < b {
            ColliderPair { first: a, second: b }
        } else {
            ColliderPair { first: b, second: a }
        }
    }

    /// The smaller id.
    #[inline]
    pub fn first(&self) -> ColliderId {
        self.first
    }

    /// The larger id.
    #[inline]
    pub fn second(&self) -> ColliderId {
        self.second
    }

    /// Both ids, smaller first.
    pub fn ids(&self) -> (ColliderId, ColliderId) {
        (self.first, self.second)
    }

    /// Returns `true` if `id` is one of the two colliders.
    pub fn contains(&self, id: ColliderId) -> bool {
        self.first == id || self.second == id
    }

    /// Returns the partner of `id`, or `None` if `id` is not in the pair.
    pub fn other(&self, id: ColliderId) -> Option<ColliderId> {
        if id == self.first {
            Some(self.second)
        } else if id == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

impl From<(ColliderId, ColliderId)> for ColliderPair {
    fn from((a, b): (ColliderId, ColliderId)) -> ColliderPair {
        ColliderPair::new(a, b)
    }
}

impl fmt::Display for ColliderPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Returns the distinct colliders mentioned by any of `pairs`.
pub fn involved<'a, I>(pairs: I) -> FnvHashSet<ColliderId>
where
    I: IntoIterator<Item = &'a ColliderPair>,
{
    pairs
        .into_iter()
        .flat_map(|pair| [pair.first, pair.second])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let pair = ColliderPair::new(5, 2);
        assert_eq!(pair.ids(), (2, 5));
        assert_eq!(pair, ColliderPair::new(2, 5));
        assert_eq!(pair, (5, 2).into());
        assert_eq!(pair.to_string(), "(2, 5)");
    }

    #[test]
    fn test_other() {
        let pair = ColliderPair::new(1, 4);
        assert!(pair.contains(1) && pair.contains(4) && !pair.contains(2));
        assert_eq!(pair.other(1), Some(4));
        assert_eq!(pair.other(4), Some(1));
        assert_eq!(pair.other(3), None);
    }

    #[test]
    #[should_panic]
    fn test_self_pair() {
        ColliderPair::new(3, 3);
    }

    #[test]
    fn test_involved() {
        let pairs = vec![ColliderPair::new(0, 1), ColliderPair::new(1, 2), ColliderPair::new(7, 3)];
        let mut ids: Vec<_> = involved(&pairs).into_iter().collect();
        ids.sort();
        assert_eq!(ids, vec![0, 1, 2, 3, 7]);
    }
}
