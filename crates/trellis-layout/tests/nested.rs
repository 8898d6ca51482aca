//! Nested grids: size and protrusion propagation between parent and child.

use trellis_layout::{
    AlignMode, Axis, GridLayout, LayoutBox, LayoutContent, LayoutDefaults, Rect, RectSides,
    ReportedSize, Side, SizeSpec, Span,
};

fn gapless(nrows: usize, ncols: usize) -> trellis_layout::GridBuilder {
    GridLayout::builder(nrows, ncols).defaults(LayoutDefaults::gapless())
}

#[test]
fn test_child_protrusions_widen_parent_gap() {
    let parent = gapless(1, 2).build().unwrap();
    let child = gapless(1, 1).build().unwrap();
    let inner = LayoutBox::new();
    child.place_cell(inner.clone(), 1, 1).unwrap();
    parent.place_cell(&child, 1, 1).unwrap();
    let right = LayoutBox::new();
    parent.place_cell(right.clone(), 1, 2).unwrap();
    parent
        .receive_suggested_bbox(Rect::new(0.0, 0.0, 210.0, 100.0))
        .unwrap();
    assert_eq!(parent.solved().unwrap().col_gaps, vec![0.0]);

    inner.set_protrusions(RectSides::new(0.0, 10.0, 0.0, 0.0));

    assert_eq!(child.protrusions().right, 10.0);
    let solved = parent.solved().unwrap();
    assert_eq!(solved.col_gaps, vec![10.0]);
    assert_eq!(solved.col_widths, vec![100.0, 100.0]);
    assert_eq!(right.bbox(), Some(Rect::from_edges(110.0, 210.0, 0.0, 100.0)));
    assert_eq!(inner.bbox(), Some(Rect::from_edges(0.0, 100.0, 0.0, 100.0)));
}

#[test]
fn test_outside_child_absorbs_protrusions() {
    let parent = gapless(1, 2).build().unwrap();
    let child = gapless(1, 1)
        .alignment(AlignMode::outside(5.0))
        .build()
        .unwrap();
    let inner = LayoutBox::sized(Some(40.0), Some(20.0))
        .with_protrusions(RectSides::new(3.0, 0.0, 0.0, 0.0));
    child.place_cell(inner.clone(), 1, 1).unwrap();
    parent.place_cell(&child, 1, 1).unwrap();

    assert_eq!(child.protrusions(), RectSides::ZERO);
    assert_eq!(child.reported_size(), ReportedSize::fixed(53.0, 30.0));

    parent
        .receive_suggested_bbox(Rect::new(0.0, 0.0, 200.0, 30.0))
        .unwrap();
    assert_eq!(parent.solved().unwrap().col_widths[0], 53.0);
    assert_eq!(inner.bbox(), Some(Rect::from_edges(8.0, 48.0, 5.0, 25.0)));
}

#[test]
fn test_removed_child_stops_propagating() {
    let parent = gapless(1, 1).build().unwrap();
    let child = gapless(1, 1).build().unwrap();
    let leaf = LayoutBox::sized(Some(10.0), Some(10.0));
    child.place_cell(leaf.clone(), 1, 1).unwrap();
    parent.place_cell(&child, 1, 1).unwrap();
    assert_eq!(parent.reported_size(), ReportedSize::fixed(10.0, 10.0));

    assert!(parent.remove(child.as_content().as_ref()));
    assert!(child.parent().is_none());
    leaf.set_reported_size(ReportedSize::fixed(30.0, 30.0));

    assert_eq!(child.reported_size(), ReportedSize::fixed(30.0, 30.0));
    assert_eq!(parent.reported_size(), ReportedSize::new(None, None));
}

#[test]
fn test_grid_as_content_follows_side_rules() {
    let parent = gapless(1, 1)
        .col_sizes([SizeSpec::Fixed(50.0)])
        .build()
        .unwrap();
    let legend = gapless(1, 1).build().unwrap();
    legend
        .place_cell(LayoutBox::sized(Some(25.0), Some(5.0)), 1, 1)
        .unwrap();
    parent
        .place(&legend, Span::cell(1, 1).unwrap(), Side::Right)
        .unwrap();

    let content = legend.as_content();
    assert!(content.as_grid().unwrap().ptr_eq(&legend));
    assert_eq!(content.auto_size(Axis::Col, Side::Right), Some(25.0));
    assert_eq!(parent.protrusions().right, 25.0);

    parent
        .receive_suggested_bbox(Rect::new(0.0, 0.0, 100.0, 40.0))
        .unwrap();
    assert_eq!(
        legend.layout_observables().suggested_bbox.get(),
        Some(Rect::from_edges(50.0, 75.0, 0.0, 40.0))
    );
}
