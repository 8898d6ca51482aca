//! Error types for the trellis engine.

use thiserror::Error;

use crate::geometry::Axis;

/// Convenience result type used across trellis.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors raised by grid construction, structural edits and solving.
///
/// Indices are 1-based, matching how rows and columns are addressed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("A grid needs at least one {axis}, got {count}")]
    InvalidCount { axis: Axis, count: usize },

    #[error("Expected {expected} {what} for {axis}s, got {found}")]
    LengthMismatch {
        axis: Axis,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Cannot insert {axis}s at {at}: position must be within 1..={count}")]
    InsertOutOfRange { axis: Axis, at: usize, count: usize },

    #[error("{axis} {index} does not exist, the grid has {count}")]
    IndexOutOfRange {
        axis: Axis,
        index: usize,
        count: usize,
    },

    #[error("Cannot delete the last remaining {axis}")]
    DeleteLastTrack { axis: Axis },

    #[error("Invalid {axis} range {start}..={end}")]
    InvalidSpan { axis: Axis, start: usize, end: usize },

    #[error("Cannot place a grid inside itself or one of its descendants")]
    CyclicNesting,

    #[error(
        "Aspect {axis} {index} refers to {} {target}, which could not be determined",
        .axis.other()
    )]
    UnresolvableAspect {
        axis: Axis,
        index: usize,
        target: usize,
    },

    #[error(
        "Aspect {axis} {index} refers to {} {target}, but there are only {count}",
        .axis.other()
    )]
    AspectTargetOutOfRange {
        axis: Axis,
        index: usize,
        target: usize,
        count: usize,
    },

    #[error("Auto-sizing the {axis}s of a grid is not supported with relative {axis} gaps")]
    RelativeGapInAutoSize { axis: Axis },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_error_names_both_tracks() {
        let err = LayoutError::UnresolvableAspect {
            axis: Axis::Col,
            index: 1,
            target: 2,
        };
        assert_eq!(
            err.to_string(),
            "Aspect column 1 refers to row 2, which could not be determined"
        );
    }

    #[test]
    fn test_insert_error_message() {
        let err = LayoutError::InsertOutOfRange {
            axis: Axis::Row,
            at: 5,
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Cannot insert rows at 5: position must be within 1..=3"
        );
    }
}
