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

// Endpoint lists shared by the sweep-and-prune algorithms.

use crate::collider::{BoxView, ColliderId, ColliderSet};
use crate::exact::{touches_x, touches_y};
use crate::float::{n64, N64};

#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug)]
pub enum Side {
    Lower,
    Upper,
}

#[derive(Copy, Clone, Debug)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn value<B: BoxView + ?Sized>(self, side: Side, bounds: &B) -> f64 {
        match (self, side) {
            (Axis::X, Side::Lower) => bounds.min_x(),
            (Axis::X, Side::Upper) => bounds.max_x(),
            (Axis::Y, Side::Lower) => bounds.min_y(),
            (Axis::Y, Side::Upper) => bounds.max_y(),
        }
    }

    // inclusive overlap on this axis
    pub fn touches<A: BoxView + ?Sized, B: BoxView + ?Sized>(self, a: &A, b: &B) -> bool {
        match self {
            Axis::X => touches_x(a, b),
            Axis::Y => touches_y(a, b),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Endpoint {
    pub id: ColliderId,
    pub side: Side,
    pub value: f64,
}

impl Endpoint {
    // lower sorts before upper at equal values, so touching intervals overlap in list order
    pub fn key(&self) -> (N64, Side) {
        (n64(self.value), self.side)
    }
}

pub fn endpoints<B: BoxView + ?Sized>(id: ColliderId, axis: Axis, bounds: &B) -> [Endpoint; 2] {
    [
        Endpoint { id, side: Side::Lower, value: axis.value(Side::Lower, bounds) },
        Endpoint { id, side: Side::Upper, value: axis.value(Side::Upper, bounds) },
    ]
}

// re-reads every endpoint value from the current geometry
pub fn refresh<S: ColliderSet + ?Sized>(list: &mut [Endpoint], axis: Axis, colliders: &S) {
    for endpoint in list.iter_mut() {
        endpoint.value = axis.value(endpoint.side, colliders.get(endpoint.id));
    }
}

// inserts into a list that is sorted by key, keeping it sorted
pub fn insert_sorted(list: &mut Vec<Endpoint>, endpoint: Endpoint) {
    let key = endpoint.key();
    let index = list.partition_point(|other| other.key() <= key);
    list.insert(index, endpoint);
}

// Insertion sort by key. `on_swap(moving, passed)` is called each time `moving`
// is shifted left past `passed`. Nearly sorted input is sorted in about linear time.
pub fn insertion_sort<F>(list: &mut [Endpoint], mut on_swap: F)
where
    F: FnMut(&Endpoint, &Endpoint),
{
    for i in 1..list.len() {
        let moving = list[i];
        let key = moving.key();
        let mut j = i;
        while j > 0 && list[j - 1].key() > key {
            on_swap(&moving, &list[j - 1]);
            list[j] = list[j - 1];
            j -= 1;
        }
        list[j] = moving;
    }
}

#[cfg(test)]
pub fn is_sorted(list: &[Endpoint]) -> bool {
    list.windows(2).all(|pair| pair[0].key() <= pair[1].key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(id: ColliderId, side: Side, value: f64) -> Endpoint {
        Endpoint { id, side, value }
    }

    #[test]
    fn test_key_order() {
        assert!(endpoint(0, Side::Lower, 1.0).key() < endpoint(1, Side::Upper, 1.0).key());
        assert!(endpoint(0, Side::Upper, 0.5).key() < endpoint(1, Side::Lower, 1.0).key());
    }

    #[test]
    fn test_insertion_sort_reports_swaps() {
        let mut list = vec![
            endpoint(0, Side::Lower, 0.0),
            endpoint(0, Side::Upper, 1.0),
            endpoint(1, Side::Lower, 0.5),
            endpoint(1, Side::Upper, 2.0),
        ];
        let mut swaps = Vec::new();
        insertion_sort(&mut list, |moving, passed| {
            swaps.push((moving.id, moving.side, passed.id, passed.side))
        });
        assert_eq!(swaps, vec![(1, Side::Lower, 0, Side::Upper)]);
        assert!(is_sorted(&list));
        assert_eq!(list[1].id, 1);
    }

    #[test]
    fn test_insert_sorted() {
        let mut list = Vec::new();
        for &(id, side, value) in &[(0, Side::Upper, 3.0), (1, Side::Lower, 1.0), (2, Side::Lower, 3.0)] {
            insert_sorted(&mut list, endpoint(id, side, value));
        }
        assert!(is_sorted(&list));
        assert_eq!(list.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 0]);
    }
}
