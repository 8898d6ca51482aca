//! The grid layout: rows, columns, their sizing policies and placed content.
//!
//! A [`GridLayout`] is a cheap, cloneable handle to shared grid state. Grids
//! nest by placing one grid's handle into a cell of another; the child keeps
//! a weak reference to its parent so that content can be moved between grids
//! without leaving stale subscriptions behind.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, error};
use trellis_core::{Axis, LayoutError, LayoutResult, Rect, RectSides, SubscriptionId};

use crate::content::{IntoContent, LayoutContent, LayoutObservables, Owner, ReportedSize};
use crate::sizes::{AlignMode, GapSpec, LayoutDefaults, SizeSpec};
use crate::solve::{check_sizes, reported_size, SolvedGrid};
use crate::span::{IndexRange, Side, Span};

/// A piece of content together with where it sits in the grid.
pub(crate) struct Placement {
    pub id: u64,
    pub content: Rc<dyn LayoutContent>,
    pub span: Span,
    pub side: Side,
    subscriptions: [SubscriptionId; 2],
}

/// Public snapshot of a placement.
#[derive(Clone)]
pub struct Placed {
    pub content: Rc<dyn LayoutContent>,
    pub span: Span,
    pub side: Side,
}

impl fmt::Debug for Placed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placed")
            .field("span", &self.span)
            .field("side", &self.side)
            .field("is_grid", &self.content.as_grid().is_some())
            .finish()
    }
}

/// Mutable state of a grid.
pub(crate) struct GridState {
    pub nrows: usize,
    pub ncols: usize,
    pub row_sizes: Vec<SizeSpec>,
    pub col_sizes: Vec<SizeSpec>,
    pub row_gaps: Vec<GapSpec>,
    pub col_gaps: Vec<GapSpec>,
    pub alignment: AlignMode,
    /// (rows, columns)
    pub equal_protrusion_gaps: (bool, bool),
    pub defaults: LayoutDefaults,
    pub content: Vec<Placement>,
    pub suspend_depth: usize,
    pub solved: Option<SolvedGrid>,
    /// Bumped on every solve.
    pub solve_generation: u64,
    next_placement: u64,
}

impl GridState {
    pub fn count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.nrows,
            Axis::Col => self.ncols,
        }
    }

    pub fn count_mut(&mut self, axis: Axis) -> &mut usize {
        match axis {
            Axis::Row => &mut self.nrows,
            Axis::Col => &mut self.ncols,
        }
    }

    pub fn sizes(&self, axis: Axis) -> &[SizeSpec] {
        match axis {
            Axis::Row => &self.row_sizes,
            Axis::Col => &self.col_sizes,
        }
    }

    pub fn sizes_mut(&mut self, axis: Axis) -> &mut Vec<SizeSpec> {
        match axis {
            Axis::Row => &mut self.row_sizes,
            Axis::Col => &mut self.col_sizes,
        }
    }

    pub fn gaps(&self, axis: Axis) -> &[GapSpec] {
        match axis {
            Axis::Row => &self.row_gaps,
            Axis::Col => &self.col_gaps,
        }
    }

    pub fn gaps_mut(&mut self, axis: Axis) -> &mut Vec<GapSpec> {
        match axis {
            Axis::Row => &mut self.row_gaps,
            Axis::Col => &mut self.col_gaps,
        }
    }

    pub fn default_gap(&self, axis: Axis) -> GapSpec {
        match axis {
            Axis::Row => self.defaults.row_gap,
            Axis::Col => self.defaults.col_gap,
        }
    }

    pub fn equal_gaps(&self, axis: Axis) -> bool {
        match axis {
            Axis::Row => self.equal_protrusion_gaps.0,
            Axis::Col => self.equal_protrusion_gaps.1,
        }
    }

    pub fn check_index(&self, axis: Axis, index: usize) -> LayoutResult<()> {
        let count = self.count(axis);
        if index == 0 || index > count {
            return Err(LayoutError::IndexOutOfRange { axis, index, count });
        }
        Ok(())
    }
}

/// Shared allocation behind a [`GridLayout`] handle.
pub(crate) struct GridNode {
    state: RefCell<GridState>,
    observables: LayoutObservables,
    this: Weak<GridNode>,
}

impl LayoutContent for GridNode {
    fn layout_observables(&self) -> &LayoutObservables {
        &self.observables
    }

    fn receive_suggested_bbox(&self, bbox: Rect) -> LayoutResult<()> {
        match self.as_grid() {
            Some(grid) => grid.receive_suggested_bbox(bbox),
            None => Ok(()),
        }
    }

    fn as_grid(&self) -> Option<GridLayout> {
        self.this.upgrade().map(GridLayout::from_node)
    }
}

/// Builder for [`GridLayout`].
#[derive(Debug, Clone)]
pub struct GridBuilder {
    nrows: usize,
    ncols: usize,
    row_sizes: Option<Vec<SizeSpec>>,
    col_sizes: Option<Vec<SizeSpec>>,
    row_gaps: Option<Vec<GapSpec>>,
    col_gaps: Option<Vec<GapSpec>>,
    alignment: AlignMode,
    equal_protrusion_gaps: (bool, bool),
    defaults: LayoutDefaults,
}

impl GridBuilder {
    pub fn row_sizes(mut self, sizes: impl IntoIterator<Item = SizeSpec>) -> Self {
        self.row_sizes = Some(sizes.into_iter().collect());
        self
    }

    pub fn col_sizes(mut self, sizes: impl IntoIterator<Item = SizeSpec>) -> Self {
        self.col_sizes = Some(sizes.into_iter().collect());
        self
    }

    pub fn row_gaps(mut self, gaps: impl IntoIterator<Item = GapSpec>) -> Self {
        self.row_gaps = Some(gaps.into_iter().collect());
        self
    }

    pub fn col_gaps(mut self, gaps: impl IntoIterator<Item = GapSpec>) -> Self {
        self.col_gaps = Some(gaps.into_iter().collect());
        self
    }

    pub fn alignment(mut self, alignment: AlignMode) -> Self {
        self.alignment = alignment;
        self
    }

    /// Force all protrusion-driven gaps on an axis to the axis maximum.
    pub fn equal_protrusion_gaps(mut self, rows: bool, cols: bool) -> Self {
        self.equal_protrusion_gaps = (rows, cols);
        self
    }

    /// Defaults for gaps and sizes not given explicitly.
    pub fn defaults(mut self, defaults: LayoutDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Validate the configuration and create the grid.
    pub fn build(self) -> LayoutResult<GridLayout> {
        let state = self.into_state()?;
        check_sizes(&state)?;
        let grid = GridLayout {
            node: Rc::new_cyclic(|this| GridNode {
                state: RefCell::new(state),
                observables: LayoutObservables::default(),
                this: this.clone(),
            }),
        };
        grid.update()?;
        Ok(grid)
    }

    fn into_state(self) -> LayoutResult<GridState> {
        let row_sizes = track_sizes(Axis::Row, self.nrows, self.row_sizes, &self.defaults)?;
        let col_sizes = track_sizes(Axis::Col, self.ncols, self.col_sizes, &self.defaults)?;
        let row_gaps = track_gaps(Axis::Row, self.nrows, self.row_gaps, self.defaults.row_gap)?;
        let col_gaps = track_gaps(Axis::Col, self.ncols, self.col_gaps, self.defaults.col_gap)?;
        Ok(GridState {
            nrows: self.nrows,
            ncols: self.ncols,
            row_sizes,
            col_sizes,
            row_gaps,
            col_gaps,
            alignment: self.alignment,
            equal_protrusion_gaps: self.equal_protrusion_gaps,
            defaults: self.defaults,
            content: Vec::new(),
            suspend_depth: 0,
            solved: None,
            solve_generation: 0,
            next_placement: 0,
        })
    }
}

fn track_sizes(
    axis: Axis,
    count: usize,
    sizes: Option<Vec<SizeSpec>>,
    defaults: &LayoutDefaults,
) -> LayoutResult<Vec<SizeSpec>> {
    if count == 0 {
        return Err(LayoutError::InvalidCount { axis, count });
    }
    match sizes {
        Some(sizes) if sizes.len() != count => Err(LayoutError::LengthMismatch {
            axis,
            what: "sizes",
            expected: count,
            found: sizes.len(),
        }),
        Some(sizes) => Ok(sizes),
        None => Ok(vec![defaults.track_size; count]),
    }
}

fn track_gaps(
    axis: Axis,
    count: usize,
    gaps: Option<Vec<GapSpec>>,
    default: GapSpec,
) -> LayoutResult<Vec<GapSpec>> {
    let expected = count - 1;
    match gaps {
        Some(gaps) if gaps.len() != expected => Err(LayoutError::LengthMismatch {
            axis,
            what: "gaps",
            expected,
            found: gaps.len(),
        }),
        Some(gaps) => Ok(gaps),
        None => Ok(vec![default; expected]),
    }
}

/// Handle to a grid of rows and columns holding layout content.
#[derive(Clone)]
pub struct GridLayout {
    node: Rc<GridNode>,
}

impl GridLayout {
    /// A grid with default sizes and gaps.
    pub fn new(nrows: usize, ncols: usize) -> LayoutResult<Self> {
        Self::builder(nrows, ncols).build()
    }

    pub fn builder(nrows: usize, ncols: usize) -> GridBuilder {
        GridBuilder {
            nrows,
            ncols,
            row_sizes: None,
            col_sizes: None,
            row_gaps: None,
            col_gaps: None,
            alignment: AlignMode::default(),
            equal_protrusion_gaps: (false, false),
            defaults: LayoutDefaults::default(),
        }
    }

    pub(crate) fn from_node(node: Rc<GridNode>) -> Self {
        Self { node }
    }

    pub(crate) fn node(&self) -> &Rc<GridNode> {
        &self.node
    }

    pub(crate) fn state(&self) -> Ref<'_, GridState> {
        self.node.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, GridState> {
        self.node.state.borrow_mut()
    }

    /// Whether both handles refer to the same grid.
    pub fn ptr_eq(&self, other: &GridLayout) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// This grid as placeable content.
    pub fn as_content(&self) -> Rc<dyn LayoutContent> {
        self.node.clone()
    }

    /// The grid's own observable layout state.
    pub fn layout_observables(&self) -> &LayoutObservables {
        &self.node.observables
    }

    /// Size this grid reports to a parent (see [`GridLayout::update`]).
    pub fn reported_size(&self) -> ReportedSize {
        self.node.observables.reported_size.get()
    }

    /// Protrusions this grid reports to a parent.
    pub fn protrusions(&self) -> RectSides<f32> {
        self.node.observables.protrusions.get()
    }

    /// The grid this grid is placed in, if any.
    pub fn parent(&self) -> Option<GridLayout> {
        self.node.observables.parent()
    }

    pub fn nrows(&self) -> usize {
        self.state().nrows
    }

    pub fn ncols(&self) -> usize {
        self.state().ncols
    }

    /// (rows, columns)
    pub fn size(&self) -> (usize, usize) {
        let state = self.state();
        (state.nrows, state.ncols)
    }

    pub fn count(&self, axis: Axis) -> usize {
        self.state().count(axis)
    }

    pub fn row_sizes(&self) -> Vec<SizeSpec> {
        self.state().row_sizes.clone()
    }

    pub fn col_sizes(&self) -> Vec<SizeSpec> {
        self.state().col_sizes.clone()
    }

    pub fn row_gaps(&self) -> Vec<GapSpec> {
        self.state().row_gaps.clone()
    }

    pub fn col_gaps(&self) -> Vec<GapSpec> {
        self.state().col_gaps.clone()
    }

    pub fn alignment(&self) -> AlignMode {
        self.state().alignment
    }

    pub fn defaults(&self) -> LayoutDefaults {
        self.state().defaults
    }

    /// Geometry from the most recent successful solve.
    pub fn solved(&self) -> Option<SolvedGrid> {
        self.state().solved.clone()
    }

    /// Bounding box of a single cell from the most recent solve.
    pub fn cell_bbox(&self, row: usize, col: usize) -> Option<Rect> {
        self.state()
            .solved
            .as_ref()
            .and_then(|solved| solved.cell_bbox(row, col))
    }

    /// Snapshot of all placements in insertion order.
    pub fn contents(&self) -> Vec<Placed> {
        self.state().content.iter().map(Placement::snapshot).collect()
    }

    /// Placements lying within `span`, or exactly matching it if `exact`.
    pub fn contents_in(&self, span: Span, exact: bool) -> Vec<Placed> {
        self.state()
            .content
            .iter()
            .filter(|p| if exact { p.span == span } else { span.covers(&p.span) })
            .map(Placement::snapshot)
            .collect()
    }

    /// Where `content` is placed in this grid.
    pub fn placement_of(&self, content: &dyn LayoutContent) -> Option<(Span, Side)> {
        let id = content.layout_observables().placement_in(self)?;
        self.state()
            .content
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.span, p.side))
    }

    /// Whether no placement covers row or column `index`.
    pub fn is_range_empty(&self, axis: Axis, index: usize) -> bool {
        !self
            .state()
            .content
            .iter()
            .any(|p| p.span.range(axis).contains(index))
    }

    /// Place `content` at `span`, detaching it from any grid it is in.
    ///
    /// The grid grows to fit spans reaching past its last row or column.
    /// A grid can only be placed if it can report its size to a parent.
    pub fn place(&self, content: impl IntoContent, span: Span, side: Side) -> LayoutResult<()> {
        let content = content.into_content();
        if let Some(child) = content.as_grid() {
            if self.ancestors().any(|g| g.ptr_eq(&child)) {
                return Err(LayoutError::CyclicNesting);
            }
            reported_size(&child.state(), true)?;
        }

        self.with_updates_suspended(|grid| {
            detach(content.as_ref());
            let (nrows, ncols) = grid.size();
            if span.rows.end > nrows {
                grid.append_rows(span.rows.end - nrows)?;
            }
            if span.cols.end > ncols {
                grid.append_cols(span.cols.end - ncols)?;
            }
            grid.attach(content, span, side);
            Ok(())
        })
    }

    /// Place `content` in the single cell at (`row`, `col`) as inner content.
    pub fn place_cell(
        &self,
        content: impl IntoContent,
        row: usize,
        col: usize,
    ) -> LayoutResult<()> {
        self.place(content, Span::cell(row, col)?, Side::Inner)
    }

    /// Remove `content` from this grid. Returns false if it was not here.
    pub fn remove(&self, content: &dyn LayoutContent) -> bool {
        match content.layout_observables().placement_in(self) {
            Some(id) => self.remove_placement(id).is_some(),
            None => false,
        }
    }

    /// This grid followed by its parent, grandparent and so on.
    pub fn ancestors(&self) -> impl Iterator<Item = GridLayout> {
        std::iter::successors(Some(self.clone()), |g| g.parent())
    }

    fn attach(&self, content: Rc<dyn LayoutContent>, span: Span, side: Side) {
        let id = {
            let mut state = self.state_mut();
            let id = state.next_placement;
            state.next_placement += 1;
            id
        };
        let observables = content.layout_observables();
        let on_protrusions = self.change_listener();
        let on_size = self.change_listener();
        let subscriptions = [
            observables.protrusions.subscribe(move |_| on_protrusions()),
            observables.reported_size.subscribe(move |_| on_size()),
        ];
        *observables.owner.borrow_mut() = Some(Owner {
            grid: Rc::downgrade(&self.node),
            placement: id,
        });
        debug!(id, ?span, ?side, "placed content");
        self.state_mut().content.push(Placement {
            id,
            content,
            span,
            side,
            subscriptions,
        });
    }

    fn change_listener(&self) -> impl Fn() + 'static {
        let weak = Rc::downgrade(&self.node);
        move || {
            if let Some(node) = weak.upgrade() {
                GridLayout::from_node(node).update_logged();
            }
        }
    }

    /// Take a placement out of the grid, drop its subscriptions and clear
    /// the content's owner.
    pub(crate) fn remove_placement(&self, id: u64) -> Option<Placement> {
        let placement = {
            let mut state = self.state_mut();
            let index = state.content.iter().position(|p| p.id == id)?;
            state.content.remove(index)
        };
        let observables = placement.content.layout_observables();
        observables.protrusions.unsubscribe(placement.subscriptions[0]);
        observables.reported_size.unsubscribe(placement.subscriptions[1]);
        observables.owner.borrow_mut().take();
        debug!(id, span = ?placement.span, "removed content");
        self.update_logged();
        Some(placement)
    }

    /// Run [`GridLayout::update`], logging instead of returning failures.
    pub(crate) fn update_logged(&self) {
        if let Err(err) = self.update() {
            error!(%err, "grid update failed");
        }
    }

    pub fn set_row_size(&self, index: usize, size: SizeSpec) -> LayoutResult<()> {
        self.set_size(Axis::Row, index, size)
    }

    pub fn set_col_size(&self, index: usize, size: SizeSpec) -> LayoutResult<()> {
        self.set_size(Axis::Col, index, size)
    }

    /// Change the size spec of one row or column.
    pub fn set_size(&self, axis: Axis, index: usize, size: SizeSpec) -> LayoutResult<()> {
        self.state().check_index(axis, index)?;
        self.commit(|state| &mut state.sizes_mut(axis)[index - 1], size)
    }

    pub fn set_row_gap(&self, index: usize, gap: GapSpec) -> LayoutResult<()> {
        self.set_gap(Axis::Row, index, gap)
    }

    pub fn set_col_gap(&self, index: usize, gap: GapSpec) -> LayoutResult<()> {
        self.set_gap(Axis::Col, index, gap)
    }

    /// Change gap `index`, the gap after row or column `index`.
    pub fn set_gap(&self, axis: Axis, index: usize, gap: GapSpec) -> LayoutResult<()> {
        let count = self.state().gaps(axis).len();
        if index == 0 || index > count {
            return Err(LayoutError::IndexOutOfRange { axis, index, count });
        }
        self.commit(|state| &mut state.gaps_mut(axis)[index - 1], gap)
    }

    pub fn set_all_row_gaps(&self, gap: GapSpec) -> LayoutResult<()> {
        self.set_all_gaps(Axis::Row, gap)
    }

    pub fn set_all_col_gaps(&self, gap: GapSpec) -> LayoutResult<()> {
        self.set_all_gaps(Axis::Col, gap)
    }

    /// Set every gap on an axis.
    pub fn set_all_gaps(&self, axis: Axis, gap: GapSpec) -> LayoutResult<()> {
        let count = self.state().gaps(axis).len();
        self.commit(|state| state.gaps_mut(axis), vec![gap; count])
    }

    pub fn set_alignment(&self, alignment: AlignMode) -> LayoutResult<()> {
        self.commit(|state| &mut state.alignment, alignment)
    }

    pub fn set_equal_protrusion_gaps(&self, rows: bool, cols: bool) -> LayoutResult<()> {
        self.commit(|state| &mut state.equal_protrusion_gaps, (rows, cols))
    }

    /// Store `value` in `slot` and update. If the grid could no longer be
    /// sized with the new value, the old one is put back and the grid is
    /// left untouched.
    fn commit<T>(&self, slot: impl Fn(&mut GridState) -> &mut T, value: T) -> LayoutResult<()> {
        let previous = std::mem::replace(slot(&mut *self.state_mut()), value);
        if let Err(err) = self.validate() {
            debug!(%err, "rejected grid edit");
            *slot(&mut *self.state_mut()) = previous;
            return Err(err);
        }
        self.update()
    }

    /// Whether the current configuration can be sized and reported.
    fn validate(&self) -> LayoutResult<()> {
        let nested = self.parent().is_some();
        let state = self.state();
        reported_size(&state, nested)?;
        check_sizes(&state)
    }
}

impl Placement {
    fn snapshot(&self) -> Placed {
        Placed {
            content: Rc::clone(&self.content),
            span: self.span,
            side: self.side,
        }
    }

    pub fn range(&self, axis: Axis) -> IndexRange {
        self.span.range(axis)
    }
}

/// Remove `content` from whatever grid currently holds it.
pub fn detach(content: &dyn LayoutContent) -> bool {
    let owner = content
        .layout_observables()
        .owner
        .borrow()
        .as_ref()
        .map(|owner| (owner.grid.clone(), owner.placement));
    match owner {
        Some((grid, id)) => match grid.upgrade() {
            Some(node) => GridLayout::from_node(node).remove_placement(id).is_some(),
            None => {
                content.layout_observables().owner.borrow_mut().take();
                false
            }
        },
        None => false,
    }
}

impl fmt::Debug for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("GridLayout")
            .field("nrows", &state.nrows)
            .field("ncols", &state.ncols)
            .field("row_sizes", &state.row_sizes)
            .field("col_sizes", &state.col_sizes)
            .field("alignment", &state.alignment)
            .field("content", &state.content.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::LayoutBox;

    #[test]
    fn test_build_validates_counts_and_lengths() {
        assert_eq!(
            GridLayout::new(0, 2).unwrap_err(),
            LayoutError::InvalidCount { axis: Axis::Row, count: 0 }
        );
        let err = GridLayout::builder(2, 2)
            .col_sizes([SizeSpec::Fixed(10.0)])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::LengthMismatch {
                axis: Axis::Col,
                what: "sizes",
                expected: 2,
                found: 1
            }
        );
        let err = GridLayout::builder(3, 1)
            .row_gaps([GapSpec::Fixed(1.0)])
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::LengthMismatch { what: "gaps", .. }));
    }

    #[test]
    fn test_defaults_fill_sizes_and_gaps() {
        let grid = GridLayout::new(3, 2).unwrap();
        assert_eq!(grid.size(), (3, 2));
        assert_eq!(grid.row_sizes(), vec![SizeSpec::auto(); 3]);
        assert_eq!(grid.row_gaps(), vec![GapSpec::Fixed(20.0); 2]);
        assert_eq!(grid.col_gaps().len(), 1);
    }

    #[test]
    fn test_place_and_remove() {
        let grid = GridLayout::new(2, 2).unwrap();
        let b = LayoutBox::new();
        grid.place_cell(b.clone(), 2, 1).unwrap();

        assert!(b.parent().unwrap().ptr_eq(&grid));
        assert_eq!(
            grid.placement_of(b.as_ref()),
            Some((Span::cell(2, 1).unwrap(), Side::Inner))
        );
        assert_eq!(b.layout_observables().reported_size.subscriber_count(), 1);
        assert!(!grid.is_range_empty(Axis::Row, 2));
        assert!(grid.is_range_empty(Axis::Row, 1));

        assert!(grid.remove(b.as_ref()));
        assert!(!grid.remove(b.as_ref()));
        assert!(b.parent().is_none());
        assert_eq!(b.layout_observables().reported_size.subscriber_count(), 0);
        assert!(grid.contents().is_empty());
    }

    #[test]
    fn test_place_moves_content_between_grids() {
        let a = GridLayout::new(1, 1).unwrap();
        let b = GridLayout::new(1, 1).unwrap();
        let item = LayoutBox::new();
        a.place_cell(item.clone(), 1, 1).unwrap();
        b.place_cell(item.clone(), 1, 1).unwrap();

        assert!(a.contents().is_empty());
        assert_eq!(b.contents().len(), 1);
        assert!(item.parent().unwrap().ptr_eq(&b));
        assert_eq!(item.layout_observables().protrusions.subscriber_count(), 1);
    }

    #[test]
    fn test_place_grows_grid() {
        let grid = GridLayout::builder(1, 1)
            .defaults(LayoutDefaults::gapless())
            .build()
            .unwrap();
        grid.place(LayoutBox::new(), Span::new((2, 3), (1, 4)).unwrap(), Side::Inner)
            .unwrap();
        assert_eq!(grid.size(), (3, 4));
        assert_eq!(grid.row_gaps(), vec![GapSpec::Fixed(0.0); 2]);
    }

    #[test]
    fn test_cyclic_nesting_rejected() {
        let outer = GridLayout::new(1, 1).unwrap();
        let inner = GridLayout::new(1, 1).unwrap();
        outer.place_cell(&inner, 1, 1).unwrap();

        assert_eq!(
            inner.place_cell(&outer, 1, 1).unwrap_err(),
            LayoutError::CyclicNesting
        );
        assert_eq!(
            outer.place_cell(&outer, 1, 1).unwrap_err(),
            LayoutError::CyclicNesting
        );
        assert!(inner.parent().unwrap().ptr_eq(&outer));
        assert_eq!(outer.ancestors().count(), 1);
        assert_eq!(inner.ancestors().count(), 2);
    }

    #[test]
    fn test_contents_in_span() {
        let grid = GridLayout::new(3, 3).unwrap();
        grid.place_cell(LayoutBox::new(), 1, 1).unwrap();
        grid.place(LayoutBox::new(), Span::new((1, 2), (1, 2)).unwrap(), Side::Inner)
            .unwrap();
        grid.place_cell(LayoutBox::new(), 3, 3).unwrap();

        let region = Span::new((1, 2), (1, 2)).unwrap();
        assert_eq!(grid.contents_in(region, false).len(), 2);
        assert_eq!(grid.contents_in(region, true).len(), 1);
    }

    #[test]
    fn test_setters_validate_indices() {
        let grid = GridLayout::new(2, 2).unwrap();
        assert!(grid.set_col_size(3, SizeSpec::Fixed(1.0)).is_err());
        assert!(grid.set_row_gap(2, GapSpec::Fixed(1.0)).is_err());
        grid.set_row_size(2, SizeSpec::Fixed(5.0)).unwrap();
        grid.set_all_col_gaps(GapSpec::Relative(0.1)).unwrap();
        assert_eq!(grid.row_sizes()[1], SizeSpec::Fixed(5.0));
        assert_eq!(grid.col_gaps(), vec![GapSpec::Relative(0.1)]);
    }

    #[test]
    fn test_rejected_setter_keeps_old_value() {
        let grid = GridLayout::builder(1, 1)
            .row_sizes([SizeSpec::aspect(1, 1.0)])
            .build()
            .unwrap();
        assert_eq!(
            grid.set_col_size(1, SizeSpec::aspect(1, 1.0)).unwrap_err(),
            LayoutError::UnresolvableAspect {
                axis: Axis::Col,
                index: 1,
                target: 1
            }
        );
        assert_eq!(grid.col_sizes(), vec![SizeSpec::auto()]);

        let parent = GridLayout::new(1, 1).unwrap();
        let child = GridLayout::builder(1, 3)
            .col_sizes([SizeSpec::Fixed(10.0); 3])
            .build()
            .unwrap();
        parent.place_cell(&child, 1, 1).unwrap();
        assert_eq!(
            child.set_all_col_gaps(GapSpec::Relative(0.1)).unwrap_err(),
            LayoutError::RelativeGapInAutoSize { axis: Axis::Col }
        );
        assert_eq!(child.col_gaps(), vec![GapSpec::Fixed(20.0); 2]);
        assert_eq!(child.reported_size().width, Some(70.0));
    }

    #[test]
    fn test_moving_content_within_grid_solves_once() {
        let grid = GridLayout::builder(1, 3)
            .defaults(LayoutDefaults::gapless())
            .build()
            .unwrap();
        let moving = LayoutBox::new();
        let still = LayoutBox::new();
        grid.place_cell(moving.clone(), 1, 1).unwrap();
        grid.place_cell(still.clone(), 1, 3).unwrap();
        grid.receive_suggested_bbox(Rect::new(0.0, 0.0, 90.0, 10.0))
            .unwrap();
        let before = still.receive_count();

        grid.place_cell(moving.clone(), 1, 2).unwrap();

        assert_eq!(still.receive_count(), before + 1);
        assert_eq!(grid.contents().len(), 2);
        assert_eq!(moving.bbox(), Some(Rect::from_edges(30.0, 60.0, 0.0, 10.0)));
    }
}
