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

//! Exact overlap tests.
//!
//! The `intersects_*`, `boxes_intersect` and `circles_intersect` tests are
//! strict: shapes that merely touch do not intersect. The `touches_*` tests are
//! inclusive and are used by the sweep-and-prune family, whose endpoint order
//! puts a lower bound before an upper bound of equal value.

use crate::collider::{BoxView, CircleView, Collider};
use crate::geom::ShapeKind;

/// Returns `true` if the x intervals of `a` and `b` overlap (excluding borders).
#[inline]
pub fn intersects_x<A: BoxView + ?Sized, B: BoxView + ?Sized>(a: &A, b: &B) -> bool {
    a.max_x() > b.min_x() && a.min_x() < b.max_x()
}

/// Returns `true` if the y intervals of `a` and `b` overlap (excluding borders).
#[inline]
pub fn intersects_y<A: BoxView + ?Sized, B: BoxView + ?Sized>(a: &A, b: &B) -> bool {
    a.max_y() > b.min_y() && a.min_y() < b.max_y()
}

/// Returns `true` if the x intervals of `a` and `b` overlap or touch.
#[inline]
pub fn touches_x<A: BoxView + ?Sized, B: BoxView + ?Sized>(a: &A, b: &B) -> bool {
    a.max_x() >= b.min_x() && a.min_x() <= b.max_x()
}

/// Returns `true` if the y intervals of `a` and `b` overlap or touch.
#[inline]
pub fn touches_y<A: BoxView + ?Sized, B: BoxView + ?Sized>(a: &A, b: &B) -> bool {
    a.max_y() >= b.min_y() && a.min_y() <= b.max_y()
}

/// Test for intersection of two boxes (excluding borders).
pub fn boxes_intersect<A: BoxView + ?Sized, B: BoxView + ?Sized>(a: &A, b: &B) -> bool {
    intersects_x(a, b) && intersects_y(a, b)
}

/// Test for intersection of two circles (excluding borders).
pub fn circles_intersect<A: CircleView + ?Sized, B: CircleView + ?Sized>(a: &A, b: &B) -> bool {
    let r_sum = a.radius() + b.radius();
    let diff_x = a.center_x() - b.center_x();
    let diff_y = a.center_y() - b.center_y();
    r_sum * r_sum > diff_x * diff_x + diff_y * diff_y
}

/// Test for intersection of a circle and a box (excluding borders).
pub fn circle_box_intersect<C, B>(circle: &C, rect: &B) -> bool
where
    C: CircleView + ?Sized,
    B: BoxView + ?Sized,
{
    let closest_x = circle.center_x().max(rect.min_x()).min(rect.max_x());
    let closest_y = circle.center_y().max(rect.min_y()).min(rect.max_y());
    let diff_x = circle.center_x() - closest_x;
    let diff_y = circle.center_y() - closest_y;
    let dist_sq = diff_x * diff_x + diff_y * diff_y;
    let radius = circle.radius();
    if dist_sq == 0.0 {
        // center lies inside or on the box; a point on the border of a
        // degenerate circle only touches
        let point = point_box(circle);
        radius > 0.0 || (intersects_x(&point, rect) && intersects_y(&point, rect))
    } else {
        radius * radius > dist_sq
    }
}

/// Exact overlap test, dispatched on the shape kinds of both colliders.
pub fn exact_test<A: Collider + ?Sized, B: Collider + ?Sized>(a: &A, b: &B) -> bool {
    match (a.kind(), b.kind()) {
        (ShapeKind::Circle, ShapeKind::Circle) => circles_intersect(a, b),
        (ShapeKind::Rect, ShapeKind::Rect) => boxes_intersect(a, b),
        (ShapeKind::Circle, ShapeKind::Rect) => circle_box_intersect(a, b),
        (ShapeKind::Rect, ShapeKind::Circle) => circle_box_intersect(b, a),
    }
}

fn point_box<C: CircleView + ?Sized>(circle: &C) -> crate::collider::Bounds {
    crate::collider::Bounds {
        min_x: circle.center_x(),
        max_x: circle.center_x(),
        min_y: circle.center_y(),
        max_y: circle.center_y(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{v2, Shape};

    #[test]
    fn test_axis_tests() {
        let a = Shape::rect(v2(2.0, 2.0)).place(v2(0.0, 0.0));
        let b = Shape::rect(v2(2.0, 2.0)).place(v2(2.0, 1.0));
        assert!(!intersects_x(&a, &b));
        assert!(touches_x(&a, &b));
        assert!(intersects_y(&a, &b));
        assert!(touches_y(&a, &b));
        assert!(!boxes_intersect(&a, &b));
        let c = Shape::rect(v2(2.0, 2.0)).place(v2(1.5, 1.0));
        assert!(boxes_intersect(&a, &c));
        assert!(boxes_intersect(&c, &a));
    }

    #[test]
    fn test_circles() {
        let a = Shape::circle(0.02).place(v2(0.0, 0.0));
        let b = Shape::circle(0.02).place(v2(0.0, 0.0));
        assert!(circles_intersect(&a, &b));
        // exactly touching is not an intersection
        let a = Shape::circle(0.2).place(v2(-0.1, 0.0));
        let b = Shape::circle(0.2).place(v2(0.1, 0.0));
        assert!(!circles_intersect(&a, &b));
        let b = Shape::circle(0.2).place(v2(0.09, 0.0));
        assert!(circles_intersect(&a, &b));
    }

    #[test]
    fn test_circle_box() {
        let rect = Shape::rect(v2(2.0, 2.0)).place(v2(0.0, 0.0));
        assert!(circle_box_intersect(&Shape::circle(1.0).place(v2(1.4, 0.0)), &rect));
        assert!(!circle_box_intersect(&Shape::circle(1.0).place(v2(1.5, 0.0)), &rect));
        // near a corner the circle must reach the corner itself
        assert!(!circle_box_intersect(&Shape::circle(1.0).place(v2(1.4, 1.4)), &rect));
        assert!(circle_box_intersect(&Shape::circle(1.0).place(v2(1.3, 1.3)), &rect));
        // center inside
        assert!(circle_box_intersect(&Shape::circle(0.0).place(v2(0.5, 0.5)), &rect));
        // zero radius on the border only touches
        assert!(!circle_box_intersect(&Shape::circle(0.0).place(v2(1.0, 0.5)), &rect));
    }

    #[test]
    fn test_exact_dispatch() {
        let circle = Shape::circle(2.0).place(v2(0.0, 0.0));
        let rect = Shape::rect(v2(2.0, 2.0)).place(v2(1.9, 0.0));
        let far_rect = Shape::rect(v2(2.0, 2.0)).place(v2(1.9, 1.9));
        assert!(exact_test(&circle, &rect));
        assert!(exact_test(&rect, &circle));
        assert!(!exact_test(&circle, &far_rect));
        // bounding boxes overlap, but the shapes do not
        assert!(boxes_intersect(&circle, &far_rect));
        assert!(exact_test(&rect, &far_rect));
    }
}
