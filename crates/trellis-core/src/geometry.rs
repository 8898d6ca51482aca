//! Geometry primitives.
//!
//! All coordinates are in pixels with the y axis pointing up: a rect's
//! `y` is its bottom edge and `y + height` its top edge.

use std::fmt;

use glam::Vec2;

/// Axis-aligned rectangle, y-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rect from its origin (bottom-left corner) and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rect from its four edges.
    pub fn from_edges(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            x: left,
            y: bottom,
            width: right - left,
            height: top - bottom,
        }
    }

    /// Create a rect from origin and size vectors.
    pub fn from_vecs(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// Bottom-left corner as a vector.
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Extent of the rect along an axis: height for rows, width for columns.
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Row => self.height,
            Axis::Col => self.width,
        }
    }

    /// Shrink the rect by the given amount on each side.
    pub fn inset(&self, sides: RectSides<f32>) -> Rect {
        let (shift, shrink) = sides.offsets();
        Rect::from_vecs(self.origin() + shift, self.size() - shrink)
    }

    /// Grow the rect by the given amount on each side.
    pub fn outset(&self, sides: RectSides<f32>) -> Rect {
        let (shift, grow) = sides.offsets();
        Rect::from_vecs(self.origin() - shift, self.size() + grow)
    }
}

/// One value per side of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectSides<T> {
    pub left: T,
    pub right: T,
    pub bottom: T,
    pub top: T,
}

impl<T> RectSides<T> {
    pub const fn new(left: T, right: T, bottom: T, top: T) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Apply `f` to every side.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> RectSides<U> {
        RectSides {
            left: f(self.left),
            right: f(self.right),
            bottom: f(self.bottom),
            top: f(self.top),
        }
    }
}

impl<T: Copy> RectSides<T> {
    /// The same value on every side.
    pub const fn uniform(value: T) -> Self {
        Self::new(value, value, value, value)
    }

    /// The two sides bounding an axis, in (start, stop) order: (top, bottom)
    /// for rows, (left, right) for columns.
    pub fn along(&self, axis: Axis) -> (T, T) {
        match axis {
            Axis::Row => (self.top, self.bottom),
            Axis::Col => (self.left, self.right),
        }
    }
}

impl RectSides<f32> {
    /// All sides zero.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Total of the left and right sides.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total of the bottom and top sides.
    pub fn vertical(&self) -> f32 {
        self.bottom + self.top
    }

    /// Bottom-left offset and total size change of insetting by these sides.
    fn offsets(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.left, self.bottom),
            Vec2::new(self.horizontal(), self.vertical()),
        )
    }
}

/// Row direction or column direction.
///
/// `Row` concerns heights and the vertical extent, `Col` widths and the
/// horizontal extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Row,
    Col,
}

impl Axis {
    /// The other axis.
    pub fn other(self) -> Axis {
        match self {
            Axis::Row => Axis::Col,
            Axis::Col => Axis::Row,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Col => f.write_str("column"),
        }
    }
}
