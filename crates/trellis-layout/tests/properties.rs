//! Property-based invariant tests for the grid solver.
//!
//! 1. Fixed tracks keep their literal size in any bounding box.
//! 2. Relative fractions summing to one fill the usable width.
//! 3. Solving twice in the same box gives identical geometry.
//! 4. Inserting rows and deleting them again restores the grid.
//! 5. Every resolved track is at least one pixel.

use proptest::prelude::*;
use trellis_layout::{
    GapSpec, GridLayout, LayoutBox, LayoutDefaults, Rect, SizeSpec, Side, Span,
};

fn fixed_sizes(max_len: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(1.0f32..200.0, 1..=max_len)
}

fn bbox() -> impl Strategy<Value = Rect> {
    (-100.0f32..100.0, -100.0f32..100.0, 10.0f32..2000.0, 10.0f32..2000.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn gapless(nrows: usize, ncols: usize) -> trellis_layout::GridBuilder {
    GridLayout::builder(nrows, ncols).defaults(LayoutDefaults::gapless())
}

proptest! {
    #[test]
    fn fixed_sizes_are_exact(
        cols in fixed_sizes(6),
        rows in fixed_sizes(6),
        bbox in bbox(),
    ) {
        let grid = gapless(rows.len(), cols.len())
            .col_sizes(cols.iter().map(|&w| SizeSpec::Fixed(w)))
            .row_sizes(rows.iter().map(|&h| SizeSpec::Fixed(h)))
            .build()
            .unwrap();
        grid.solve(bbox).unwrap();
        let solved = grid.solved().unwrap();
        prop_assert_eq!(solved.col_widths, cols);
        prop_assert_eq!(solved.row_heights, rows);
    }
}

proptest! {
    #[test]
    fn relative_fractions_fill_width(
        weights in proptest::collection::vec(10u32..100, 1..8),
        width in 100.0f32..2000.0,
    ) {
        let total: u32 = weights.iter().sum();
        let fractions: Vec<f32> = weights.iter().map(|&w| w as f32 / total as f32).collect();
        let grid = gapless(1, fractions.len())
            .col_sizes(fractions.iter().map(|&f| SizeSpec::Relative(f)))
            .build()
            .unwrap();
        grid.solve(Rect::new(0.0, 0.0, width, 100.0)).unwrap();

        let widths = grid.solved().unwrap().col_widths;
        let sum: f32 = widths.iter().sum();
        prop_assert!((sum - width).abs() < 0.01);
        for (w, f) in widths.iter().zip(&fractions) {
            prop_assert!((w - f * width).abs() < 0.001);
        }
    }
}

proptest! {
    #[test]
    fn solve_is_idempotent(
        nrows in 1usize..5,
        ncols in 1usize..5,
        bbox in bbox(),
        sizes in proptest::collection::vec((0.0f32..80.0, 0.0f32..80.0), 0..6),
    ) {
        let grid = GridLayout::new(nrows, ncols).unwrap();
        let boxes: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let b = LayoutBox::sized(Some(w), Some(h));
                grid.place_cell(b.clone(), i % nrows + 1, i % ncols + 1).unwrap();
                b
            })
            .collect();

        grid.solve(bbox).unwrap();
        let first = grid.solved();
        let first_boxes: Vec<_> = boxes.iter().map(|b| b.bbox()).collect();
        grid.solve(bbox).unwrap();

        prop_assert_eq!(first, grid.solved());
        let second_boxes: Vec<_> = boxes.iter().map(|b| b.bbox()).collect();
        prop_assert_eq!(first_boxes, second_boxes);
    }
}

proptest! {
    #[test]
    fn insert_then_delete_restores(
        nrows in 1usize..6,
        at_seed in 0usize..100,
        n in 1usize..4,
        row_seed in 0usize..100,
    ) {
        let at = at_seed % nrows + 1;
        let grid = GridLayout::builder(nrows, 1)
            .row_sizes((0..nrows).map(|i| SizeSpec::Fixed(10.0 + i as f32)))
            .row_gaps((1..nrows).map(|i| GapSpec::Fixed(i as f32)))
            .build()
            .unwrap();
        let row = row_seed % nrows + 1;
        let item = LayoutBox::new();
        grid.place(item.clone(), Span::cell(row, 1).unwrap(), Side::Bottom).unwrap();

        let sizes = grid.row_sizes();
        let gaps = grid.row_gaps();
        grid.insert_rows(at, n).unwrap();
        for _ in 0..n {
            grid.delete_row(at).unwrap();
        }

        prop_assert_eq!(grid.nrows(), nrows);
        prop_assert_eq!(grid.row_sizes(), sizes);
        prop_assert_eq!(grid.row_gaps(), gaps);
        prop_assert_eq!(
            grid.placement_of(item.as_ref()),
            Some((Span::cell(row, 1).unwrap(), Side::Bottom))
        );
    }
}

proptest! {
    #[test]
    fn tracks_never_below_one_pixel(
        cols in proptest::collection::vec(0.0f32..500.0, 1..6),
        autos in 0usize..3,
        width in 1.0f32..300.0,
    ) {
        let specs: Vec<SizeSpec> = cols
            .iter()
            .map(|&w| SizeSpec::Fixed(w))
            .chain(std::iter::repeat(SizeSpec::auto()).take(autos))
            .collect();
        let grid = gapless(1, specs.len()).col_sizes(specs).build().unwrap();
        grid.solve(Rect::new(0.0, 0.0, width, 50.0)).unwrap();

        for w in grid.solved().unwrap().col_widths {
            prop_assert!(w >= 1.0);
        }
    }
}
