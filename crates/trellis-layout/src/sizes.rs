//! Row, column and gap sizing policies, and grid alignment modes.

use trellis_core::RectSides;

/// How a row's height or a column's width is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeSpec {
    /// Exactly this many pixels.
    Fixed(f32),
    /// Fraction of the space available to the axis's cells.
    Relative(f32),
    /// Sized from content when `try_determine` is set and some content
    /// reports a size, otherwise a `ratio` share of the leftover space.
    Auto { try_determine: bool, ratio: f32 },
    /// `ratio` times the size of track `index` (1-based) on the other axis.
    Aspect { index: usize, ratio: f32 },
}

impl SizeSpec {
    /// Content-determined auto size with ratio 1.
    pub const fn auto() -> Self {
        Self::Auto {
            try_determine: true,
            ratio: 1.0,
        }
    }

    /// Proportional share of the leftover space, never sized from content.
    pub const fn proportional(ratio: f32) -> Self {
        Self::Auto {
            try_determine: false,
            ratio,
        }
    }

    /// Locked to `ratio` times track `index` of the other axis.
    pub const fn aspect(index: usize, ratio: f32) -> Self {
        Self::Aspect { index, ratio }
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self::auto()
    }
}

/// Explicit spacing between two adjacent rows or columns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapSpec {
    /// Exactly this many pixels.
    Fixed(f32),
    /// Fraction of the axis's space after protrusion gaps.
    Relative(f32),
}

impl GapSpec {
    /// Gap in pixels given the space it is relative to.
    pub fn resolve(&self, space: f32) -> f32 {
        match *self {
            GapSpec::Fixed(x) => x,
            GapSpec::Relative(x) => x * space,
        }
    }
}

impl Default for GapSpec {
    fn default() -> Self {
        GapSpec::Fixed(0.0)
    }
}

/// Per-side behaviour of [`AlignMode::Mixed`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MixedSide {
    /// Inside semantics: protrusions stick out and are reported upward.
    #[default]
    Absent,
    /// Outside semantics with this padding.
    Padding(f32),
    /// Inside semantics, but report this protrusion upward instead.
    Protrusion(f32),
}

/// How a grid fits into the bounding box it is given.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignMode {
    /// Cells fill the bounding box; protrusions extend beyond it.
    #[default]
    Inside,
    /// Cells, their protrusions and this padding all fit the bounding box.
    Outside(RectSides<f32>),
    /// Inside or Outside semantics chosen per side.
    Mixed(RectSides<MixedSide>),
}

impl AlignMode {
    /// Outside alignment with the same padding on every side.
    pub fn outside(padding: f32) -> Self {
        AlignMode::Outside(RectSides::uniform(padding))
    }

    /// Padding subtracted from the suggested bounding box on each side.
    pub fn padding(&self) -> RectSides<f32> {
        match self {
            AlignMode::Inside => RectSides::ZERO,
            AlignMode::Outside(pad) => *pad,
            AlignMode::Mixed(sides) => sides.map(|s| match s {
                MixedSide::Padding(p) => p,
                MixedSide::Absent | MixedSide::Protrusion(_) => 0.0,
            }),
        }
    }

    /// Whether the outermost protrusion on each side is kept inside the box.
    pub fn contains_protrusions(&self) -> RectSides<bool> {
        match self {
            AlignMode::Inside => RectSides::uniform(false),
            AlignMode::Outside(_) => RectSides::uniform(true),
            AlignMode::Mixed(sides) => sides.map(|s| matches!(s, MixedSide::Padding(_))),
        }
    }

    /// Protrusions a grid with this mode reports to its parent, given the
    /// outermost protrusions of its own content.
    pub fn effective_protrusions(&self, outer: RectSides<f32>) -> RectSides<f32> {
        match self {
            AlignMode::Inside => outer,
            AlignMode::Outside(_) => RectSides::ZERO,
            AlignMode::Mixed(sides) => RectSides::new(
                mixed_protrusion(sides.left, outer.left),
                mixed_protrusion(sides.right, outer.right),
                mixed_protrusion(sides.bottom, outer.bottom),
                mixed_protrusion(sides.top, outer.top),
            ),
        }
    }
}

fn mixed_protrusion(side: MixedSide, inner: f32) -> f32 {
    match side {
        MixedSide::Absent => inner,
        MixedSide::Padding(_) => 0.0,
        MixedSide::Protrusion(p) => p,
    }
}

/// Construction defaults, passed explicitly to every grid builder.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutDefaults {
    /// Gap inserted between rows when none is given
    pub row_gap: GapSpec,
    /// Gap inserted between columns when none is given
    pub col_gap: GapSpec,
    /// Size of rows and columns added without an explicit size
    pub track_size: SizeSpec,
}

impl LayoutDefaults {
    /// Defaults with no spacing between tracks.
    pub fn gapless() -> Self {
        Self {
            row_gap: GapSpec::Fixed(0.0),
            col_gap: GapSpec::Fixed(0.0),
            ..Self::default()
        }
    }
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            row_gap: GapSpec::Fixed(20.0),
            col_gap: GapSpec::Fixed(20.0),
            track_size: SizeSpec::auto(),
        }
    }
}
