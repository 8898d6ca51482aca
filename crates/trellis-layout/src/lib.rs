//! Nested grid layout.
//!
//! A [`GridLayout`] arranges content in rows and columns whose sizes come from
//! fixed values, fractions of the available space, the content itself, or a
//! ratio of a track on the other axis. Content may stick out of its cell
//! (axis labels, tick marks); the grid widens the spacing between tracks so
//! neighbours do not overlap. Grids nest: a grid placed in another grid
//! reports its size and protrusions upward and receives its box from the
//! parent's solve.
//!
//! # Architecture
//!
//! 1. **Content contract**: anything implementing [`LayoutContent`] can be placed
//! 2. **Solving**: protrusion gaps, explicit gaps, then track sizes and edges
//! 3. **Updates**: changes propagate through observable channels, batched edits
//!    are grouped with an [`UpdateGuard`]
//!
//! # Example
//!
//! ```
//! use trellis_core::Rect;
//! use trellis_layout::{GridLayout, LayoutBox, LayoutDefaults, SizeSpec};
//!
//! let grid = GridLayout::builder(2, 2)
//!     .col_sizes([SizeSpec::Fixed(30.0), SizeSpec::auto()])
//!     .row_sizes([SizeSpec::Relative(0.25), SizeSpec::Relative(0.75)])
//!     .defaults(LayoutDefaults::gapless())
//!     .build()?;
//!
//! let item = LayoutBox::new();
//! grid.place_cell(item.clone(), 1, 1)?;
//! grid.receive_suggested_bbox(Rect::new(0.0, 0.0, 100.0, 100.0))?;
//!
//! assert_eq!(item.bbox(), Some(Rect::from_edges(0.0, 30.0, 75.0, 100.0)));
//! # Ok::<(), trellis_core::LayoutError>(())
//! ```

mod content;
mod grid;
mod mutate;
mod sizes;
mod solve;
mod span;
mod update;

pub use content::{IntoContent, LayoutBox, LayoutContent, LayoutObservables, ReportedSize};
pub use grid::{detach, GridBuilder, GridLayout, Placed};
pub use mutate::NewTracks;
pub use sizes::{AlignMode, GapSpec, LayoutDefaults, MixedSide, SizeSpec};
pub use solve::SolvedGrid;
pub use span::{Edge, IndexRange, Side, Span};
pub use update::UpdateGuard;

pub use trellis_core::{Axis, LayoutError, LayoutResult, Rect, RectSides};
