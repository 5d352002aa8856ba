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

use crate::collider::{BoxView, CircleView, Collider};
use crate::geom::*;

#[test]
fn test_edges() {
    let shape = Shape::rect(v2(4.0, 6.0)).place(v2(3.0, 5.0));
    assert_eq!(shape.min_x(), 1.0);
    assert_eq!(shape.min_y(), 2.0);
    assert_eq!(shape.max_x(), 5.0);
    assert_eq!(shape.max_y(), 8.0);
}

#[test]
fn test_circle_views() {
    let shape = Shape::circle(2.0).place(v2(3.0, 5.0));
    assert_eq!(Collider::kind(&shape), ShapeKind::Circle);
    assert_eq!(shape.center(), v2(3.0, 5.0));
    assert_eq!(shape.radius(), 1.0);
    assert_eq!(shape.min_x(), 2.0);
    assert_eq!(shape.max_x(), 4.0);
    assert_eq!(shape.min_y(), 4.0);
    assert_eq!(shape.max_y(), 6.0);
}

#[test]
fn test_rect_bounding_circle() {
    let shape = Shape::rect(v2(6.0, 8.0)).place(v2(0.0, 0.0));
    assert_eq!(Collider::kind(&shape), ShapeKind::Rect);
    assert_eq!(shape.radius(), 5.0);
    // every corner lies on the bounding circle
    let corner = v2(shape.max_x(), shape.max_y());
    assert_eq!(corner.dist_sq(shape.center()), shape.radius() * shape.radius());
}

#[test]
fn test_square() {
    assert_eq!(Shape::square(2.0), Shape::rect(v2(2.0, 2.0)));
    assert_eq!(Shape::square(2.0).dims(), v2(2.0, 2.0));
}

#[test]
#[should_panic]
fn test_negative_dims() {
    Shape::rect(v2(-1.0, 2.0));
}

#[test]
#[should_panic]
fn test_uneven_circle() {
    Shape::new(ShapeKind::Circle, v2(1.0, 2.0));
}
