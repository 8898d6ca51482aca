//! Structural edits: adding, removing and regrouping rows and columns.
//!
//! Every edit runs with updates suspended and ends in a single update.

use tracing::debug;
use trellis_core::{Axis, LayoutError, LayoutResult};

use crate::grid::GridLayout;
use crate::sizes::{GapSpec, SizeSpec};
use crate::span::{IndexRange, Side, Span};

/// Rows or columns to add, with optional explicit sizes and gaps.
///
/// Each new track brings one gap. Sizes and gaps left out fall back to the
/// grid's [`LayoutDefaults`](crate::LayoutDefaults).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTracks {
    pub count: usize,
    pub sizes: Option<Vec<SizeSpec>>,
    pub gaps: Option<Vec<GapSpec>>,
}

impl NewTracks {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn with_sizes(mut self, sizes: impl IntoIterator<Item = SizeSpec>) -> Self {
        self.sizes = Some(sizes.into_iter().collect());
        self
    }

    pub fn with_gaps(mut self, gaps: impl IntoIterator<Item = GapSpec>) -> Self {
        self.gaps = Some(gaps.into_iter().collect());
        self
    }
}

impl From<usize> for NewTracks {
    fn from(count: usize) -> Self {
        Self::new(count)
    }
}

impl GridLayout {
    pub fn append_rows(&self, n: usize) -> LayoutResult<()> {
        self.append_tracks(Axis::Row, n)
    }

    pub fn append_cols(&self, n: usize) -> LayoutResult<()> {
        self.append_tracks(Axis::Col, n)
    }

    pub fn prepend_rows(&self, n: usize) -> LayoutResult<()> {
        self.prepend_tracks(Axis::Row, n)
    }

    pub fn prepend_cols(&self, n: usize) -> LayoutResult<()> {
        self.prepend_tracks(Axis::Col, n)
    }

    /// Insert `n` rows before row `at`.
    pub fn insert_rows(&self, at: usize, n: usize) -> LayoutResult<()> {
        self.insert_tracks(Axis::Row, at, n)
    }

    /// Insert `n` columns before column `at`.
    pub fn insert_cols(&self, at: usize, n: usize) -> LayoutResult<()> {
        self.insert_tracks(Axis::Col, at, n)
    }

    /// Add tracks after the last row or column.
    pub fn append_tracks(&self, axis: Axis, tracks: impl Into<NewTracks>) -> LayoutResult<()> {
        let at = self.count(axis) + 1;
        self.add_tracks(axis, at, tracks.into())
    }

    /// Add tracks before the first row or column.
    pub fn prepend_tracks(&self, axis: Axis, tracks: impl Into<NewTracks>) -> LayoutResult<()> {
        self.add_tracks(axis, 1, tracks.into())
    }

    /// Add tracks before track `at`, which must exist.
    ///
    /// Content starting at or after `at` moves along; content spanning
    /// across `at` grows to cover the new tracks.
    pub fn insert_tracks(
        &self,
        axis: Axis,
        at: usize,
        tracks: impl Into<NewTracks>,
    ) -> LayoutResult<()> {
        let count = self.count(axis);
        if at == 0 || at > count {
            return Err(LayoutError::InsertOutOfRange { axis, at, count });
        }
        self.add_tracks(axis, at, tracks.into())
    }

    fn add_tracks(&self, axis: Axis, at: usize, tracks: NewTracks) -> LayoutResult<()> {
        let n = tracks.count;
        if n == 0 {
            return Ok(());
        }
        let (sizes, gaps) = {
            let state = self.state();
            let sizes = fill_or_check(axis, "sizes", n, tracks.sizes, state.defaults.track_size)?;
            let gaps = fill_or_check(axis, "gaps", n, tracks.gaps, state.default_gap(axis))?;
            (sizes, gaps)
        };

        self.with_updates_suspended(|grid| {
            let mut state = grid.state_mut();
            let index = at - 1;
            insert_all(state.sizes_mut(axis), index, sizes);
            let gap_index = index.min(state.gaps(axis).len());
            insert_all(state.gaps_mut(axis), gap_index, gaps);
            *state.count_mut(axis) += n;
            for placement in &mut state.content {
                let range = placement.span.range_mut(axis);
                *range = range.shifted_for_insert(at, n);
            }
            debug!(%axis, at, n, count = state.count(axis), "inserted tracks");
            Ok(())
        })
    }

    pub fn delete_row(&self, index: usize) -> LayoutResult<()> {
        self.delete_track(Axis::Row, index)
    }

    pub fn delete_col(&self, index: usize) -> LayoutResult<()> {
        self.delete_track(Axis::Col, index)
    }

    /// Delete a row or column.
    ///
    /// Content only in that track is removed from the grid, content spanning
    /// it shrinks. The gap after the track goes with it, or the gap before
    /// it when it is the last one.
    pub fn delete_track(&self, axis: Axis, index: usize) -> LayoutResult<()> {
        {
            let state = self.state();
            state.check_index(axis, index)?;
            if state.count(axis) < 2 {
                return Err(LayoutError::DeleteLastTrack { axis });
            }
        }

        self.with_updates_suspended(|grid| {
            let emptied: Vec<u64> = grid
                .state()
                .content
                .iter()
                .filter(|p| p.range(axis).shifted_for_delete(index).is_none())
                .map(|p| p.id)
                .collect();
            for id in &emptied {
                grid.remove_placement(*id);
            }

            let mut state = grid.state_mut();
            for placement in &mut state.content {
                let range = placement.span.range_mut(axis);
                if let Some(shifted) = range.shifted_for_delete(index) {
                    *range = shifted;
                }
            }
            let count = state.count(axis);
            state.sizes_mut(axis).remove(index - 1);
            let gap = if index == count { index - 2 } else { index - 1 };
            state.gaps_mut(axis).remove(gap);
            *state.count_mut(axis) -= 1;
            debug!(%axis, index, removed = emptied.len(), "deleted track");
            Ok(())
        })
    }

    /// Delete empty rows and columns until none are left, keeping at least
    /// one of each. Returns how many tracks were deleted.
    pub fn trim(&self) -> LayoutResult<usize> {
        self.with_updates_suspended(|grid| {
            let mut deleted = 0;
            for axis in [Axis::Row, Axis::Col] {
                while grid.count(axis) > 1 {
                    let empty = (1..=grid.count(axis)).find(|&i| grid.is_range_empty(axis, i));
                    match empty {
                        Some(index) => {
                            grid.delete_track(axis, index)?;
                            deleted += 1;
                        }
                        None => break,
                    }
                }
            }
            Ok(deleted)
        })
    }

    /// Move all content inside `rows` × `cols` into a new child grid and
    /// place that grid over the same cells.
    ///
    /// The child has one track per covered row and column and the parent's
    /// defaults. Content keeps its side and its position relative to the
    /// region. If some content cannot be moved, whatever was already moved
    /// goes back to its old cells and the child is discarded.
    pub fn nest(&self, rows: IndexRange, cols: IndexRange) -> LayoutResult<GridLayout> {
        let region = Span { rows, cols };
        let defaults = self.defaults();
        let child = GridLayout::builder(rows.len(), cols.len())
            .defaults(defaults)
            .build()?;

        self.with_updates_suspended(|grid| {
            let moved = grid.contents_in(region, false);
            let result = child.with_updates_suspended(|child| {
                for placed in &moved {
                    let span = Span {
                        rows: placed.span.rows.relative_to(rows.start),
                        cols: placed.span.cols.relative_to(cols.start),
                    };
                    child.place(placed.content.clone(), span, placed.side)?;
                }
                Ok(())
            });
            if let Err(err) = result {
                for placed in &moved {
                    if grid.placement_of(placed.content.as_ref()).is_none() {
                        grid.place(placed.content.clone(), placed.span, placed.side)?;
                    }
                }
                return Err(err);
            }
            debug!(?region, moved = moved.len(), "nested content into child grid");
            grid.place(&child, region, Side::Inner)
        })?;
        Ok(child)
    }
}

fn insert_all<T>(values: &mut Vec<T>, index: usize, new: Vec<T>) {
    let tail = values.split_off(index);
    values.extend(new);
    values.extend(tail);
}

fn fill_or_check<T: Copy>(
    axis: Axis,
    what: &'static str,
    n: usize,
    given: Option<Vec<T>>,
    default: T,
) -> LayoutResult<Vec<T>> {
    match given {
        Some(values) if values.len() != n => Err(LayoutError::LengthMismatch {
            axis,
            what,
            expected: n,
            found: values.len(),
        }),
        Some(values) => Ok(values),
        None => Ok(vec![default; n]),
    }
}
