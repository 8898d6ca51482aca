//! Recomputation: keeping a grid's reported values and geometry current.
//!
//! Every change to a grid ends in [`GridLayout::update`]. An update first
//! refreshes the size and protrusions the grid reports upward. If they
//! changed and a parent is listening, the parent solves and hands this grid
//! a new bounding box. Otherwise the grid re-solves in the box it was last
//! given.
//!
//! Batched edits suspend updates with an [`UpdateGuard`]; the outermost
//! guard runs a single update when it is released.

use tracing::{debug, error, trace};
use trellis_core::{LayoutResult, Rect};

use crate::grid::GridLayout;
use crate::solve::{effective_protrusions, reported_size, solve_grid};

impl GridLayout {
    /// Recompute reported values and re-solve as needed.
    ///
    /// Does nothing while updates are suspended. When both the reported size
    /// and the protrusions change, only the protrusion channel fires.
    pub fn update(&self) -> LayoutResult<()> {
        if self.is_suspended() {
            return Ok(());
        }

        let nested = self.parent().is_some();
        let (size, protrusions) = {
            let state = self.state();
            (reported_size(&state, nested)?, effective_protrusions(&state))
        };

        let observables = self.layout_observables();
        let size_changed = observables.reported_size.get() != size;
        let protrusions_changed = observables.protrusions.get() != protrusions;
        if size_changed {
            observables.reported_size.set_silently(size);
        }
        if protrusions_changed {
            observables.protrusions.set_silently(protrusions);
        }

        if (size_changed || protrusions_changed) && self.parent().is_some() {
            debug!(?size, ?protrusions, "reported values changed, deferring to parent");
            if protrusions_changed {
                observables.protrusions.notify();
            } else {
                observables.reported_size.notify();
            }
            return Ok(());
        }

        if size_changed {
            observables.reported_size.notify();
        }
        if protrusions_changed {
            observables.protrusions.notify();
        }
        self.solve_current()
    }

    /// Re-solve in the last suggested bounding box, if there is one.
    pub fn solve_current(&self) -> LayoutResult<()> {
        match self.layout_observables().suggested_bbox.get() {
            Some(bbox) => self.solve(bbox),
            None => Ok(()),
        }
    }

    /// Solve the grid in `bbox` and hand every placement its box.
    ///
    /// On failure nothing is published and the previous geometry stays.
    /// Content reacting to its box may trigger a newer solve of this grid;
    /// once that has happened the remaining boxes from this one are stale
    /// and are not handed out.
    pub fn solve(&self, bbox: Rect) -> LayoutResult<()> {
        let output = solve_grid(&self.state(), bbox)?;
        let generation = {
            let mut state = self.state_mut();
            state.solved = Some(output.solved);
            state.solve_generation += 1;
            state.solve_generation
        };
        for (content, rect) in output.assignments {
            content.receive_suggested_bbox(rect)?;
            if self.state().solve_generation != generation {
                trace!(generation, "grid re-solved while publishing, dropping stale boxes");
                break;
            }
        }
        Ok(())
    }

    /// Store `bbox` as the grid's suggested bounding box and solve in it.
    pub fn receive_suggested_bbox(&self, bbox: Rect) -> LayoutResult<()> {
        self.layout_observables().suggested_bbox.set(Some(bbox));
        if self.is_suspended() {
            return Ok(());
        }
        self.solve(bbox)
    }

    pub fn is_suspended(&self) -> bool {
        self.state().suspend_depth > 0
    }

    /// Suspend updates until the returned guard is released.
    ///
    /// Guards nest. Releasing the outermost one runs one update.
    pub fn suspend_updates(&self) -> UpdateGuard {
        self.state_mut().suspend_depth += 1;
        UpdateGuard {
            grid: Some(self.clone()),
        }
    }

    /// Run `f` with updates suspended, then update once.
    ///
    /// If `f` fails its error is returned and the update still runs; a
    /// failure of that update is only logged.
    pub fn with_updates_suspended<R>(
        &self,
        f: impl FnOnce(&GridLayout) -> LayoutResult<R>,
    ) -> LayoutResult<R> {
        let guard = self.suspend_updates();
        let value = f(self)?;
        guard.finish()?;
        Ok(value)
    }
}

/// Scope guard returned by [`GridLayout::suspend_updates`].
#[must_use = "updates resume when the guard is dropped"]
pub struct UpdateGuard {
    grid: Option<GridLayout>,
}

impl UpdateGuard {
    /// Release the guard and return the result of the resulting update.
    pub fn finish(mut self) -> LayoutResult<()> {
        self.release()
    }

    fn release(&mut self) -> LayoutResult<()> {
        let Some(grid) = self.grid.take() else {
            return Ok(());
        };
        let depth = {
            let mut state = grid.state_mut();
            state.suspend_depth = state.suspend_depth.saturating_sub(1);
            state.suspend_depth
        };
        if depth == 0 {
            grid.update()
        } else {
            Ok(())
        }
    }
}

impl Drop for UpdateGuard {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            error!(%err, "deferred grid update failed");
        }
    }
}
