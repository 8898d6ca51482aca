//! Spans of rows and columns, and the side of a span content attaches to.

use trellis_core::{Axis, LayoutError, LayoutResult};

/// Inclusive, 1-based range of row or column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    /// Create a range, checking `1 <= start <= end`.
    pub fn new(axis: Axis, start: usize, end: usize) -> LayoutResult<Self> {
        if start == 0 || start > end {
            return Err(LayoutError::InvalidSpan { axis, start, end });
        }
        Ok(Self { start, end })
    }

    /// A single index.
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// Number of indices covered.
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Whether `other` lies completely within this range.
    pub fn covers(&self, other: &IndexRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Adjust the range for `n` tracks inserted before index `at`.
    ///
    /// Ranges before `at` are unchanged, ranges starting at or after it move
    /// by `n`, and ranges straddling it grow by `n`.
    pub fn shifted_for_insert(self, at: usize, n: usize) -> Self {
        if self.start >= at {
            Self {
                start: self.start + n,
                end: self.end + n,
            }
        } else if self.end >= at {
            Self {
                start: self.start,
                end: self.end + n,
            }
        } else {
            self
        }
    }

    /// Adjust the range for the deletion of `index`. Returns `None` if the
    /// range covered only that index.
    pub fn shifted_for_delete(self, index: usize) -> Option<Self> {
        if self.contains(index) {
            if self.is_single() {
                None
            } else {
                Some(Self {
                    start: self.start,
                    end: self.end - 1,
                })
            }
        } else if index < self.start {
            Some(Self {
                start: self.start - 1,
                end: self.end - 1,
            })
        } else {
            Some(self)
        }
    }

    /// Translate the range so that `origin` becomes index 1.
    pub fn relative_to(self, origin: usize) -> Self {
        Self {
            start: self.start + 1 - origin,
            end: self.end + 1 - origin,
        }
    }
}

/// The rectangular block of cells a piece of content occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub rows: IndexRange,
    pub cols: IndexRange,
}

impl Span {
    /// Create a span from inclusive row and column ranges.
    pub fn new(rows: (usize, usize), cols: (usize, usize)) -> LayoutResult<Self> {
        Ok(Self {
            rows: IndexRange::new(Axis::Row, rows.0, rows.1)?,
            cols: IndexRange::new(Axis::Col, cols.0, cols.1)?,
        })
    }

    /// A single cell.
    pub fn cell(row: usize, col: usize) -> LayoutResult<Self> {
        Self::new((row, row), (col, col))
    }

    /// The range along one axis.
    pub fn range(&self, axis: Axis) -> IndexRange {
        match axis {
            Axis::Row => self.rows,
            Axis::Col => self.cols,
        }
    }

    pub fn range_mut(&mut self, axis: Axis) -> &mut IndexRange {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Col => &mut self.cols,
        }
    }

    /// Whether `other` lies completely within this span.
    pub fn covers(&self, other: &Span) -> bool {
        self.rows.covers(&other.rows) && self.cols.covers(&other.cols)
    }
}

/// Which part of its span a piece of content occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The cell interior.
    #[default]
    Inner,
    /// The cell interior plus every protrusion around it.
    Outer,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Side {
    /// Horizontal edge this side is anchored to, if any.
    pub fn horizontal(&self) -> Option<Edge> {
        match self {
            Side::Left | Side::TopLeft | Side::BottomLeft => Some(Edge::Left),
            Side::Right | Side::TopRight | Side::BottomRight => Some(Edge::Right),
            _ => None,
        }
    }

    /// Vertical edge this side is anchored to, if any.
    pub fn vertical(&self) -> Option<Edge> {
        match self {
            Side::Top | Side::TopLeft | Side::TopRight => Some(Edge::Top),
            Side::Bottom | Side::BottomLeft | Side::BottomRight => Some(Edge::Bottom),
            _ => None,
        }
    }
}

/// One of the four edges of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}
