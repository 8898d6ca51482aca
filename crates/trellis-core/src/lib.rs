//! Foundation types for the trellis layout engine.
//!
//! This crate provides the types shared by every other trellis crate:
//! - Geometry (`Rect`, `RectSides`, `Axis`)
//! - The observable-value channel used for change notification
//! - Error types

pub mod errors;
pub mod geometry;
pub mod observable;

pub use errors::*;
pub use geometry::*;
pub use observable::*;
