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

// IndexRect represents a non-empty rectangular (column, row) range inside a
// grid of known dimensions.

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct IndexRect {
    start: (usize, usize),
    end: (usize, usize),
}

impl IndexRect {
    // start is inclusive, end is exclusive
    pub fn new(start: (usize, usize), end: (usize, usize)) -> IndexRect {
        assert!(
            start.0 < end.0 && start.1 < end.1,
            "IndexRect contains no elements"
        );
        IndexRect { start, end }
    }

    // min and max are inclusive and may lie outside of the grid; both are
    // clamped to the nearest edge cell, so the result is never empty
    pub fn clamped(min: (i64, i64), max: (i64, i64), dims: (usize, usize)) -> IndexRect {
        assert!(dims.0 > 0 && dims.1 > 0, "grid has no cells");
        let start = (clamp_index(min.0, dims.0), clamp_index(min.1, dims.1));
        let last = (clamp_index(max.0, dims.0), clamp_index(max.1, dims.1));
        assert!(start.0 <= last.0 && start.1 <= last.1, "min must not exceed max");
        IndexRect::new(start, (last.0 + 1, last.1 + 1))
    }

    // cells within `reach` steps of `center` (Chebyshev distance), cut off at the grid edges
    pub fn around(center: (usize, usize), reach: usize, dims: (usize, usize)) -> IndexRect {
        assert!(center.0 < dims.0 && center.1 < dims.1, "center outside of grid");
        let start = (center.0.saturating_sub(reach), center.1.saturating_sub(reach));
        let end = (
            (center.0 + reach + 1).min(dims.0),
            (center.1 + reach + 1).min(dims.1),
        );
        IndexRect::new(start, end)
    }

    pub fn iter(self) -> Iter {
        Iter::new(self)
    }
}

pub fn clamp_index(index: i64, count: usize) -> usize {
    if index <= 0 {
        0
    } else {
        (index as usize).min(count - 1)
    }
}

pub struct Iter {
    rect: IndexRect,
    val: Option<(usize, usize)>,
}

impl Iter {
    fn new(rect: IndexRect) -> Iter {
        Iter { rect, val: None }
    }
}

// visits cells row by row
impl Iterator for Iter {
    type Item = (usize, usize);
    fn next(&mut self) -> Option<(usize, usize)> {
        self.val = match self.val {
            Some((x, y)) => {
                if x == self.rect.end.0 - 1 {
                    if y == self.rect.end.1 - 1 {
                        return None;
                    } else {
                        Some((self.rect.start.0, y + 1))
                    }
                } else {
                    Some((x + 1, y))
                }
            }
            None => Some(self.rect.start),
        };
        self.val
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_iterator() {
        let rect = IndexRect::new((2, 3), (5, 7));
        let mut set = HashSet::new();
        for (x, y) in rect.iter() {
            assert!(x >= 2 && x < 5);
            assert!(y >= 3 && y < 7);
            assert!(set.insert((x, y)));
        }
        assert_eq!(set.len(), 12);
    }

    #[test]
    fn test_iterator_is_fused() {
        let mut iter = IndexRect::new((0, 0), (1, 1)).iter();
        assert_eq!(iter.next(), Some((0, 0)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    #[should_panic]
    fn test_new_bad_x() {
        IndexRect::new((4, 5), (4, 6));
    }

    #[test]
    #[should_panic]
    fn test_new_bad_y() {
        IndexRect::new((4, 5), (5, 5));
    }

    #[test]
    fn test_clamped() {
        let rect = IndexRect::clamped((-3, 1), (2, 9), (4, 4));
        assert_eq!(rect, IndexRect::new((0, 1), (3, 4)));
        // entirely beyond the far edge still lands in the last column
        let rect = IndexRect::clamped((7, 0), (9, 0), (4, 4));
        assert_eq!(rect, IndexRect::new((3, 0), (4, 1)));
        // entirely before the near edge lands in the first row
        let rect = IndexRect::clamped((1, -9), (1, -5), (4, 4));
        assert_eq!(rect, IndexRect::new((1, 0), (2, 1)));
    }

    #[test]
    fn test_around() {
        assert_eq!(IndexRect::around((0, 0), 1, (4, 4)), IndexRect::new((0, 0), (2, 2)));
        assert_eq!(IndexRect::around((2, 1), 1, (4, 4)), IndexRect::new((1, 0), (4, 3)));
        assert_eq!(IndexRect::around((3, 3), 2, (4, 4)), IndexRect::new((1, 1), (4, 4)));
        assert_eq!(IndexRect::around((0, 0), 1, (1, 1)).iter().count(), 1);
    }
}
