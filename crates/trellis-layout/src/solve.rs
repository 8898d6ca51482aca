//! Track sizing and bounding-box assignment.
//!
//! Solving a grid happens in two stages. First the protrusions of all placed
//! content are collected into per-track maxima, which determine the spacing
//! each track boundary needs. Then the row heights and column widths are
//! resolved against the space that is left, edges are accumulated from the
//! top-left corner, and every placement gets its box.
//!
//! The functions here only read grid state. Publishing boxes to content is
//! left to the caller so that no borrow is held while content reacts.

use std::rc::Rc;

use tracing::{trace, warn};
use trellis_core::{Axis, LayoutError, LayoutResult, Rect, RectSides};

use crate::content::{LayoutContent, ReportedSize};
use crate::grid::{GridState, Placement};
use crate::sizes::{GapSpec, SizeSpec};
use crate::span::{Edge, Side, Span};

/// Largest protrusion at each track edge.
///
/// `lefts[i]` is the widest left protrusion of content starting in column
/// `i + 1`, `rights[i]` the widest right protrusion of content ending there.
/// Rows work the same way with `tops` and `bottoms`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProtrusionGrid {
    pub lefts: Vec<f32>,
    pub rights: Vec<f32>,
    pub tops: Vec<f32>,
    pub bottoms: Vec<f32>,
}

impl ProtrusionGrid {
    pub fn collect(state: &GridState) -> Self {
        let mut grid = Self {
            lefts: vec![0.0; state.ncols],
            rights: vec![0.0; state.ncols],
            tops: vec![0.0; state.nrows],
            bottoms: vec![0.0; state.nrows],
        };
        for placement in &state.content {
            let p = placement_protrusions(placement);
            let span = placement.span;
            raise(&mut grid.lefts[span.cols.start - 1], p.left);
            raise(&mut grid.rights[span.cols.end - 1], p.right);
            raise(&mut grid.tops[span.rows.start - 1], p.top);
            raise(&mut grid.bottoms[span.rows.end - 1], p.bottom);
        }
        grid
    }

    /// (start, stop) protrusion arrays for an axis.
    pub fn along(&self, axis: Axis) -> (&[f32], &[f32]) {
        match axis {
            Axis::Row => (&self.tops, &self.bottoms),
            Axis::Col => (&self.lefts, &self.rights),
        }
    }

    /// Protrusions on the outer edges of the grid.
    pub fn outer(&self) -> RectSides<f32> {
        RectSides::new(
            first(&self.lefts),
            last(&self.rights),
            last(&self.bottoms),
            first(&self.tops),
        )
    }

    /// Spacing needed at each internal boundary of an axis.
    pub fn gaps(&self, axis: Axis, equalize: bool) -> Vec<f32> {
        let (starts, stops) = self.along(axis);
        let mut gaps: Vec<f32> = stops
            .iter()
            .zip(starts.iter().skip(1))
            .map(|(stop, start)| stop + start)
            .collect();
        if equalize {
            let max = gaps.iter().copied().fold(0.0, f32::max);
            gaps.fill(max);
        }
        gaps
    }

    /// Protrusions of the cells at the edges of `span`.
    fn around(&self, span: &Span) -> RectSides<f32> {
        RectSides::new(
            self.lefts[span.cols.start - 1],
            self.rights[span.cols.end - 1],
            self.bottoms[span.rows.end - 1],
            self.tops[span.rows.start - 1],
        )
    }
}

fn raise(slot: &mut f32, value: f32) {
    *slot = slot.max(value);
}

fn first(values: &[f32]) -> f32 {
    values.first().copied().unwrap_or(0.0)
}

fn last(values: &[f32]) -> f32 {
    values.last().copied().unwrap_or(0.0)
}

/// How far a placement reaches past the edges of its cells.
///
/// Inner content protrudes by its own protrusions. Content placed on a side
/// strip occupies the protrusion there, so its size along that direction
/// counts as a protrusion of the span.
fn placement_protrusions(placement: &Placement) -> RectSides<f32> {
    let content = &placement.content;
    let side = placement.side;
    match side {
        Side::Inner => content.protrusions(),
        Side::Outer => RectSides::ZERO,
        _ => {
            let width = content.auto_size(Axis::Col, side).unwrap_or(0.0);
            let height = content.auto_size(Axis::Row, side).unwrap_or(0.0);
            let horizontal = side.horizontal();
            let vertical = side.vertical();
            RectSides::new(
                if horizontal == Some(Edge::Left) { width } else { 0.0 },
                if horizontal == Some(Edge::Right) { width } else { 0.0 },
                if vertical == Some(Edge::Bottom) { height } else { 0.0 },
                if vertical == Some(Edge::Top) { height } else { 0.0 },
            )
        }
    }
}

/// Size of track `index` (1-based) if it can be known without a bounding box.
pub(crate) fn determine_track_size(state: &GridState, axis: Axis, index: usize) -> Option<f32> {
    match state.sizes(axis)[index - 1] {
        SizeSpec::Fixed(x) => Some(x),
        SizeSpec::Auto {
            try_determine: true,
            ..
        } => state
            .content
            .iter()
            .filter(|p| p.side == Side::Inner)
            .filter(|p| {
                let range = p.range(axis);
                range.is_single() && range.start == index
            })
            .filter_map(|p| p.content.auto_size(axis, Side::Inner))
            .reduce(f32::max),
        SizeSpec::Relative(_) | SizeSpec::Auto { .. } | SizeSpec::Aspect { .. } => None,
    }
}

/// Total extent of the grid along `axis`, if every track is determinable.
pub(crate) fn determine_axis_size(
    state: &GridState,
    protrusions: &ProtrusionGrid,
    axis: Axis,
) -> LayoutResult<Option<f32>> {
    let mut total = 0.0;
    for index in 1..=state.count(axis) {
        match determine_track_size(state, axis, index) {
            Some(size) => total += size,
            None => return Ok(None),
        }
    }

    total += protrusions
        .gaps(axis, state.equal_gaps(axis))
        .iter()
        .sum::<f32>();

    for gap in state.gaps(axis) {
        match gap {
            GapSpec::Fixed(x) => total += x,
            GapSpec::Relative(_) => return Err(LayoutError::RelativeGapInAutoSize { axis }),
        }
    }

    let (pad_start, pad_stop) = state.alignment.padding().along(axis);
    let (outer_start, outer_stop) = protrusions.outer().along(axis);
    let (contains_start, contains_stop) = state.alignment.contains_protrusions().along(axis);
    if contains_start {
        total += pad_start + outer_start;
    }
    if contains_stop {
        total += pad_stop + outer_stop;
    }
    Ok(Some(total))
}

/// The size a grid reports to its parent.
///
/// Relative gaps on a fully determinable axis are an error only for a
/// `nested` grid. A top-level grid reports that axis as unknown.
pub(crate) fn reported_size(state: &GridState, nested: bool) -> LayoutResult<ReportedSize> {
    let protrusions = ProtrusionGrid::collect(state);
    let axis_size = |axis| match determine_axis_size(state, &protrusions, axis) {
        Err(LayoutError::RelativeGapInAutoSize { .. }) if !nested => Ok(None),
        other => other,
    };
    Ok(ReportedSize::new(axis_size(Axis::Col)?, axis_size(Axis::Row)?))
}

/// Check that every track can be resolved, independent of any bounding box.
pub(crate) fn check_sizes(state: &GridState) -> LayoutResult<()> {
    compute_sizes(state, 0.0, 0.0).map(|_| ())
}

/// The protrusions a grid reports to its parent.
pub(crate) fn effective_protrusions(state: &GridState) -> RectSides<f32> {
    let outer = ProtrusionGrid::collect(state).outer();
    state.alignment.effective_protrusions(outer)
}

/// Geometry of a solved grid. Indices into the vectors are 0-based.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolvedGrid {
    /// The suggested bounding box the grid was solved in
    pub bbox: Rect,
    /// The bounding box minus alignment padding
    pub usable: Rect,
    pub col_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    /// Final spacing between columns, explicit gap plus protrusion gap
    pub col_gaps: Vec<f32>,
    /// Final spacing between rows, explicit gap plus protrusion gap
    pub row_gaps: Vec<f32>,
    pub col_lefts: Vec<f32>,
    pub col_rights: Vec<f32>,
    pub row_tops: Vec<f32>,
    pub row_bottoms: Vec<f32>,
}

impl SolvedGrid {
    /// Box of the cell at 1-based (`row`, `col`).
    pub fn cell_bbox(&self, row: usize, col: usize) -> Option<Rect> {
        let span = Span::cell(row, col).ok()?;
        self.span_bbox(&span)
    }

    /// Box covering every cell of `span`, without protrusions.
    pub fn span_bbox(&self, span: &Span) -> Option<Rect> {
        Some(Rect::from_edges(
            *self.col_lefts.get(span.cols.start - 1)?,
            *self.col_rights.get(span.cols.end - 1)?,
            *self.row_bottoms.get(span.rows.end - 1)?,
            *self.row_tops.get(span.rows.start - 1)?,
        ))
    }
}

/// A solved grid and the box each placement should receive.
pub(crate) struct SolveOutput {
    pub solved: SolvedGrid,
    pub assignments: Vec<(Rc<dyn LayoutContent>, Rect)>,
}

/// Space left on one axis after protrusion gaps and explicit gaps.
struct AxisBudget {
    protrusion_gaps: Vec<f32>,
    added_gaps: Vec<f32>,
    space: f32,
}

fn axis_budget(
    state: &GridState,
    protrusions: &ProtrusionGrid,
    usable: &Rect,
    axis: Axis,
) -> AxisBudget {
    let protrusion_gaps = protrusions.gaps(axis, state.equal_gaps(axis));
    let (outer_start, outer_stop) = protrusions.outer().along(axis);
    let (contains_start, contains_stop) = state.alignment.contains_protrusions().along(axis);

    let mut remaining = usable.extent(axis) - protrusion_gaps.iter().sum::<f32>();
    if contains_start {
        remaining -= outer_start;
    }
    if contains_stop {
        remaining -= outer_stop;
    }

    let added_gaps: Vec<f32> = state
        .gaps(axis)
        .iter()
        .map(|gap| gap.resolve(remaining))
        .collect();
    let space = remaining - added_gaps.iter().sum::<f32>();
    AxisBudget {
        protrusion_gaps,
        added_gaps,
        space,
    }
}

/// Solve the grid in `bbox` without touching any content.
pub(crate) fn solve_grid(state: &GridState, bbox: Rect) -> LayoutResult<SolveOutput> {
    let usable = bbox.inset(state.alignment.padding());
    let protrusions = ProtrusionGrid::collect(state);
    let outer = protrusions.outer();
    let contains = state.alignment.contains_protrusions();

    let cols = axis_budget(state, &protrusions, &usable, Axis::Col);
    let rows = axis_budget(state, &protrusions, &usable, Axis::Row);

    let (mut col_widths, mut row_heights) = compute_sizes(state, cols.space, rows.space)?;
    clamp_sizes(Axis::Col, &mut col_widths);
    clamp_sizes(Axis::Row, &mut row_heights);

    let col_gaps = final_gaps(&cols);
    let row_gaps = final_gaps(&rows);

    let mut x = usable.left() + if contains.left { outer.left } else { 0.0 };
    let mut col_lefts = Vec::with_capacity(state.ncols);
    let mut col_rights = Vec::with_capacity(state.ncols);
    for (i, width) in col_widths.iter().enumerate() {
        col_lefts.push(x);
        col_rights.push(x + width);
        x += width + col_gaps.get(i).copied().unwrap_or(0.0);
    }

    let mut y = usable.top() - if contains.top { outer.top } else { 0.0 };
    let mut row_tops = Vec::with_capacity(state.nrows);
    let mut row_bottoms = Vec::with_capacity(state.nrows);
    for (i, height) in row_heights.iter().enumerate() {
        row_tops.push(y);
        row_bottoms.push(y - height);
        y -= height + row_gaps.get(i).copied().unwrap_or(0.0);
    }

    trace!(?col_widths, ?row_heights, "resolved track sizes");

    let solved = SolvedGrid {
        bbox,
        usable,
        col_widths,
        row_heights,
        col_gaps,
        row_gaps,
        col_lefts,
        col_rights,
        row_tops,
        row_bottoms,
    };

    let assignments = state
        .content
        .iter()
        .filter_map(|p| {
            let cell = solved.span_bbox(&p.span)?;
            let rect = bbox_for_side(cell, protrusions.around(&p.span), p.side);
            Some((Rc::clone(&p.content), rect))
        })
        .collect();

    Ok(SolveOutput {
        solved,
        assignments,
    })
}

fn final_gaps(budget: &AxisBudget) -> Vec<f32> {
    budget
        .added_gaps
        .iter()
        .zip(&budget.protrusion_gaps)
        .map(|(added, protrusion)| added + protrusion)
        .collect()
}

fn clamp_sizes(axis: Axis, sizes: &mut [f32]) {
    for (i, size) in sizes.iter_mut().enumerate() {
        if *size < 1.0 || size.is_nan() {
            warn!(%axis, index = i + 1, size = *size, "track does not fit, clamping to 1px");
            *size = 1.0;
        }
    }
}

/// The box a placement receives, given its cell box and the protrusions
/// around its span.
pub(crate) fn bbox_for_side(cell: Rect, p: RectSides<f32>, side: Side) -> Rect {
    let (l, r, b, t) = (cell.left(), cell.right(), cell.bottom(), cell.top());
    match side {
        Side::Inner => cell,
        Side::Outer => cell.outset(p),
        Side::Left => Rect::from_edges(l - p.left, l, b, t),
        Side::Right => Rect::from_edges(r, r + p.right, b, t),
        Side::Top => Rect::from_edges(l, r, t, t + p.top),
        Side::Bottom => Rect::from_edges(l, r, b - p.bottom, b),
        Side::TopLeft => Rect::from_edges(l - p.left, l, t, t + p.top),
        Side::TopRight => Rect::from_edges(r, r + p.right, t, t + p.top),
        Side::BottomLeft => Rect::from_edges(l - p.left, l, b - p.bottom, b),
        Side::BottomRight => Rect::from_edges(r, r + p.right, b - p.bottom, b),
    }
}

/// Resolve every column width and row height given the space left for
/// cells on each axis.
pub(crate) fn compute_sizes(
    state: &GridState,
    col_space: f32,
    row_space: f32,
) -> LayoutResult<(Vec<f32>, Vec<f32>)> {
    check_aspect_targets(state, Axis::Col)?;
    check_aspect_targets(state, Axis::Row)?;

    let mut cols = initial_sizes(state, Axis::Col, col_space);
    let mut rows = initial_sizes(state, Axis::Row, row_space);

    resolve_aspects(state.sizes(Axis::Col), &mut cols, &rows);
    resolve_aspects(state.sizes(Axis::Row), &mut rows, &cols);

    let cols_waiting = has_pending_aspect(state.sizes(Axis::Col), &cols);
    let rows_waiting = has_pending_aspect(state.sizes(Axis::Row), &rows);
    if !cols_waiting {
        distribute_autos(state.sizes(Axis::Col), &mut cols, col_space);
    }
    if !rows_waiting {
        distribute_autos(state.sizes(Axis::Row), &mut rows, row_space);
    }

    resolve_aspects(state.sizes(Axis::Col), &mut cols, &rows);
    resolve_aspects(state.sizes(Axis::Row), &mut rows, &cols);

    for (axis, sizes) in [(Axis::Col, &cols), (Axis::Row, &rows)] {
        if let Some((index, target)) = first_pending_aspect(state.sizes(axis), sizes) {
            return Err(LayoutError::UnresolvableAspect {
                axis,
                index,
                target,
            });
        }
    }

    distribute_autos(state.sizes(Axis::Col), &mut cols, col_space);
    distribute_autos(state.sizes(Axis::Row), &mut rows, row_space);

    Ok((determined(Axis::Col, cols), determined(Axis::Row, rows)))
}

fn check_aspect_targets(state: &GridState, axis: Axis) -> LayoutResult<()> {
    let count = state.count(axis.other());
    for (i, spec) in state.sizes(axis).iter().enumerate() {
        if let SizeSpec::Aspect { index, .. } = *spec {
            if index == 0 || index > count {
                return Err(LayoutError::AspectTargetOutOfRange {
                    axis,
                    index: i + 1,
                    target: index,
                    count,
                });
            }
        }
    }
    Ok(())
}

fn initial_sizes(state: &GridState, axis: Axis, space: f32) -> Vec<Option<f32>> {
    state
        .sizes(axis)
        .iter()
        .enumerate()
        .map(|(i, spec)| match *spec {
            SizeSpec::Relative(fraction) => Some(fraction * space),
            _ => determine_track_size(state, axis, i + 1),
        })
        .collect()
}

fn resolve_aspects(specs: &[SizeSpec], sizes: &mut [Option<f32>], other: &[Option<f32>]) {
    for (spec, size) in specs.iter().zip(sizes.iter_mut()) {
        if let (SizeSpec::Aspect { index, ratio }, None) = (*spec, *size) {
            if let Some(target) = other[index - 1] {
                *size = Some(ratio * target);
            }
        }
    }
}

fn first_pending_aspect(specs: &[SizeSpec], sizes: &[Option<f32>]) -> Option<(usize, usize)> {
    specs
        .iter()
        .zip(sizes)
        .enumerate()
        .find_map(|(i, (spec, size))| match (*spec, size) {
            (SizeSpec::Aspect { index, .. }, None) => Some((i + 1, index)),
            _ => None,
        })
}

fn has_pending_aspect(specs: &[SizeSpec], sizes: &[Option<f32>]) -> bool {
    first_pending_aspect(specs, sizes).is_some()
}

/// Share what is left of `space` among undetermined auto tracks by ratio.
fn distribute_autos(specs: &[SizeSpec], sizes: &mut [Option<f32>], space: f32) {
    let used: f32 = sizes.iter().flatten().sum();
    let ratio_sum: f32 = specs
        .iter()
        .zip(sizes.iter())
        .filter_map(|(spec, size)| match (spec, size) {
            (SizeSpec::Auto { ratio, .. }, None) => Some(*ratio),
            _ => None,
        })
        .sum();
    let leftover = space - used;
    for (spec, size) in specs.iter().zip(sizes.iter_mut()) {
        if let (SizeSpec::Auto { ratio, .. }, true) = (*spec, size.is_none()) {
            let share = if ratio_sum > 0.0 { ratio / ratio_sum } else { 0.0 };
            *size = Some(leftover * share);
        }
    }
}

fn determined(axis: Axis, sizes: Vec<Option<f32>>) -> Vec<f32> {
    sizes
        .into_iter()
        .enumerate()
        .map(|(i, size)| {
            size.unwrap_or_else(|| panic!("{axis} {} left undetermined after sizing", i + 1))
        })
        .collect()
}
