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
use crate::geom::{v2, Vec2};

#[cfg(test)]
mod tests;

/// Enumeration of kinds of shapes used for the exact test.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum ShapeKind {
    /// Circle.  Requires width and height to match.
    Circle,
    /// Axis-aligned rectangle.
    Rect,
}

/// Represents a shape, without any position.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Shape {
    kind: ShapeKind,
    dims: Vec2,
}

impl Shape {
    /// Constructs a new shape with the given `kind` and `dims` (width and height dimensions).
    ///
    /// Dimensions must be non-negative.
    /// If `kind` is `Circle`, then the width and height must match.
    pub fn new(kind: ShapeKind, dims: Vec2) -> Shape {
        assert!(dims.x >= 0.0 && dims.y >= 0.0, "dims must be non-negative");
        if kind == ShapeKind::Circle {
            assert!(dims.x == dims.y, "circle width must equal height");
        }
        Shape { kind, dims }
    }

    /// Constructs a new circle shape, using `diam` as the width and height.
    #[inline]
    pub fn circle(diam: f64) -> Shape {
        Shape::new(ShapeKind::Circle, v2(diam, diam))
    }

    /// Constructs a new axis-aligned rectangle shape with the given `dims` (width and height dimensions).
    #[inline]
    pub fn rect(dims: Vec2) -> Shape {
        Shape::new(ShapeKind::Rect, dims)
    }

    /// Constructs a new axis-aligned square shape with the given `width`.
    #[inline]
    pub fn square(width: f64) -> Shape {
        Shape::new(ShapeKind::Rect, v2(width, width))
    }

    /// Returns the kind of shape.
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Returns the dims of the shape.
    #[inline]
    pub fn dims(&self) -> Vec2 {
        self.dims
    }

    /// Shorthand for `PlacedShape::new(pos, self)`.
    pub fn place(self, pos: Vec2) -> PlacedShape {
        PlacedShape::new(pos, self)
    }
}

/// Represents a shape with a position. This is a ready-made `Collider`.
///
/// The circle view of a `Rect` is its bounding circle, so radius-based
/// algorithms stay conservative for rects.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct PlacedShape {
    /// The position of the center of the shape.
    pub pos: Vec2,
    /// The shape.
    pub shape: Shape,
}

impl PlacedShape {
    /// Constructs a new `PlacedShape` with the given `pos` and `shape`.
    #[inline]
    pub fn new(pos: Vec2, shape: Shape) -> PlacedShape {
        PlacedShape { pos, shape }
    }

    /// Shorthand for `self.shape.kind()`
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Shorthand for `self.shape.dims()`
    #[inline]
    pub fn dims(&self) -> Vec2 {
        self.shape.dims()
    }
}

impl BoxView for PlacedShape {
    fn min_x(&self) -> f64 { self.pos.x - self.dims().x * 0.5 }
    fn max_x(&self) -> f64 { self.pos.x + self.dims().x * 0.5 }
    fn min_y(&self) -> f64 { self.pos.y - self.dims().y * 0.5 }
    fn max_y(&self) -> f64 { self.pos.y + self.dims().y * 0.5 }
}

impl CircleView for PlacedShape {
    fn center_x(&self) -> f64 {
        self.pos.x
    }

    fn center_y(&self) -> f64 {
        self.pos.y
    }

    fn radius(&self) -> f64 {
        match self.kind() {
            ShapeKind::Circle => self.dims().x * 0.5,
            ShapeKind::Rect => self.dims().len() * 0.5,
        }
    }
}

impl Collider for PlacedShape {
    fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
}
