//! The contract between a grid and the things placed in it.
//!
//! A grid never looks inside its content. It reads the content's reported
//! size and protrusions, hands it a suggested bounding box after solving, and
//! listens to two change channels so it can re-solve when the content's
//! reported values change.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use trellis_core::{Axis, LayoutResult, Observable, Rect, RectSides};

use crate::grid::{GridLayout, GridNode};
use crate::span::Side;

/// Intrinsic width and height of a piece of content, where known.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportedSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl ReportedSize {
    pub fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self { width, height }
    }

    /// Both dimensions known.
    pub fn fixed(width: f32, height: f32) -> Self {
        Self::new(Some(width), Some(height))
    }

    /// Size along an axis: height for rows, width for columns.
    pub fn along(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Row => self.height,
            Axis::Col => self.width,
        }
    }
}

/// The grid a piece of content currently belongs to.
pub(crate) struct Owner {
    pub grid: Weak<GridNode>,
    pub placement: u64,
}

/// Observable state every piece of layout content carries.
pub struct LayoutObservables {
    /// Space needed outside the cell on each side.
    pub protrusions: Observable<RectSides<f32>>,
    /// Intrinsic size, if known.
    pub reported_size: Observable<ReportedSize>,
    /// Last bounding box suggested by the owning grid (or the host).
    pub suggested_bbox: Observable<Option<Rect>>,
    pub(crate) owner: RefCell<Option<Owner>>,
}

impl LayoutObservables {
    pub fn new(reported_size: ReportedSize, protrusions: RectSides<f32>) -> Self {
        Self {
            protrusions: Observable::new(protrusions),
            reported_size: Observable::new(reported_size),
            suggested_bbox: Observable::new(None),
            owner: RefCell::new(None),
        }
    }

    /// The grid this content is currently placed in.
    pub fn parent(&self) -> Option<GridLayout> {
        self.owner
            .borrow()
            .as_ref()
            .and_then(|owner| owner.grid.upgrade())
            .map(GridLayout::from_node)
    }

    pub(crate) fn placement_in(&self, grid: &GridLayout) -> Option<u64> {
        self.owner.borrow().as_ref().and_then(|owner| {
            let same = owner
                .grid
                .upgrade()
                .is_some_and(|node| Rc::ptr_eq(&node, grid.node()));
            same.then_some(owner.placement)
        })
    }
}

impl Default for LayoutObservables {
    fn default() -> Self {
        Self::new(ReportedSize::default(), RectSides::ZERO)
    }
}

impl fmt::Debug for LayoutObservables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutObservables")
            .field("protrusions", &self.protrusions.get())
            .field("reported_size", &self.reported_size.get())
            .field("suggested_bbox", &self.suggested_bbox.get())
            .field("placed", &self.owner.borrow().is_some())
            .finish()
    }
}

/// Anything that can be placed in a grid.
pub trait LayoutContent {
    /// The content's observable layout state.
    fn layout_observables(&self) -> &LayoutObservables;

    /// Lay the content out in `bbox`. Called by the owning grid after every
    /// solve; the content may update its reported size or protrusions.
    fn receive_suggested_bbox(&self, bbox: Rect) -> LayoutResult<()>;

    fn reported_size(&self) -> ReportedSize {
        self.layout_observables().reported_size.get()
    }

    fn protrusions(&self) -> RectSides<f32> {
        self.layout_observables().protrusions.get()
    }

    /// Size the content would need along `axis` when placed at `side`.
    ///
    /// Content on a left or right strip only has a width, content on a top
    /// or bottom strip only a height.
    fn auto_size(&self, axis: Axis, side: Side) -> Option<f32> {
        let size = self.reported_size();
        match (axis, side) {
            (_, Side::Outer) => None,
            (Axis::Col, Side::Top | Side::Bottom) => None,
            (Axis::Row, Side::Left | Side::Right) => None,
            (axis, _) => size.along(axis),
        }
    }

    /// The grid behind this content, if it is one.
    fn as_grid(&self) -> Option<GridLayout> {
        None
    }
}

/// Conversion into shared layout content, accepted by [`GridLayout::place`].
pub trait IntoContent {
    fn into_content(self) -> Rc<dyn LayoutContent>;
}

impl<T: LayoutContent + 'static> IntoContent for Rc<T> {
    fn into_content(self) -> Rc<dyn LayoutContent> {
        self
    }
}

impl IntoContent for Rc<dyn LayoutContent> {
    fn into_content(self) -> Rc<dyn LayoutContent> {
        self
    }
}

impl IntoContent for GridLayout {
    fn into_content(self) -> Rc<dyn LayoutContent> {
        self.as_content()
    }
}

impl IntoContent for &GridLayout {
    fn into_content(self) -> Rc<dyn LayoutContent> {
        self.as_content()
    }
}

/// A plain rectangular leaf with a settable reported size and protrusions.
///
/// It records the last bounding box it was given and nothing else.
#[derive(Debug, Default)]
pub struct LayoutBox {
    observables: LayoutObservables,
    received: Cell<usize>,
}

impl LayoutBox {
    /// A box with no intrinsic size and no protrusions.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A box reporting the given size.
    pub fn sized(width: Option<f32>, height: Option<f32>) -> Rc<Self> {
        Rc::new(Self {
            observables: LayoutObservables::new(ReportedSize::new(width, height), RectSides::ZERO),
            received: Cell::new(0),
        })
    }

    /// Builder-style protrusions, set before the box is shared.
    pub fn with_protrusions(self: Rc<Self>, protrusions: RectSides<f32>) -> Rc<Self> {
        self.observables.protrusions.set_silently(protrusions);
        self
    }

    /// Change the reported size, notifying the owning grid if it changed.
    pub fn set_reported_size(&self, size: ReportedSize) {
        self.observables.reported_size.set_if_changed(size);
    }

    /// Change the protrusions, notifying the owning grid if they changed.
    pub fn set_protrusions(&self, protrusions: RectSides<f32>) {
        self.observables.protrusions.set_if_changed(protrusions);
    }

    /// The last bounding box received from the owning grid.
    pub fn bbox(&self) -> Option<Rect> {
        self.observables.suggested_bbox.get()
    }

    /// How many bounding boxes this box has received.
    pub fn receive_count(&self) -> usize {
        self.received.get()
    }

    /// The grid this box is placed in.
    pub fn parent(&self) -> Option<GridLayout> {
        self.observables.parent()
    }
}

impl LayoutContent for LayoutBox {
    fn layout_observables(&self) -> &LayoutObservables {
        &self.observables
    }

    fn receive_suggested_bbox(&self, bbox: Rect) -> LayoutResult<()> {
        self.received.set(self.received.get() + 1);
        self.observables.suggested_bbox.set(Some(bbox));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_size_follows_side() {
        let b = LayoutBox::sized(Some(30.0), Some(10.0));
        assert_eq!(b.auto_size(Axis::Col, Side::Inner), Some(30.0));
        assert_eq!(b.auto_size(Axis::Row, Side::Inner), Some(10.0));
        assert_eq!(b.auto_size(Axis::Col, Side::Left), Some(30.0));
        assert_eq!(b.auto_size(Axis::Row, Side::Left), None);
        assert_eq!(b.auto_size(Axis::Row, Side::Top), Some(10.0));
        assert_eq!(b.auto_size(Axis::Col, Side::Top), None);
        assert_eq!(b.auto_size(Axis::Col, Side::BottomRight), Some(30.0));
        assert_eq!(b.auto_size(Axis::Row, Side::Outer), None);
    }

    #[test]
    fn test_layout_box_records_bbox() {
        let b = LayoutBox::new();
        assert_eq!(b.bbox(), None);
        b.receive_suggested_bbox(Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(b.bbox(), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(b.receive_count(), 1);
    }

    #[test]
    fn test_setters_only_notify_on_change() {
        let b = LayoutBox::sized(Some(1.0), None);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        b.layout_observables()
            .reported_size
            .subscribe(move |_| h.set(h.get() + 1));

        b.set_reported_size(ReportedSize::new(Some(1.0), None));
        b.set_reported_size(ReportedSize::fixed(2.0, 3.0));
        assert_eq!(hits.get(), 1);
        assert_eq!(b.reported_size(), ReportedSize::fixed(2.0, 3.0));
    }
}
