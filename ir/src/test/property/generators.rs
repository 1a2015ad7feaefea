//! Proptest strategies for shapes and reduction dimension sets.

use proptest::prelude::*;
use vesta_dtype::test::proptests::generators::primitive_type;

use crate::{DimensionSet, Layout, Shape};

/// Random permutation of `0..rank`.
pub fn layout(rank: usize) -> impl Strategy<Value = Layout> {
    Just((0..rank).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(|perm| Layout::new(perm).expect("shuffle is a permutation"))
}

/// Shape of rank `1..=max_rank` with sizes in `min_size..=max_size` and a random layout.
pub fn shape(max_rank: usize, min_size: usize, max_size: usize) -> impl Strategy<Value = Shape> {
    (1..=max_rank).prop_flat_map(move |rank| {
        (primitive_type(), prop::collection::vec(min_size..=max_size, rank), layout(rank)).prop_map(
            |(element_type, dims, layout)| Shape::new(element_type, dims, layout).expect("ranks agree"),
        )
    })
}

/// Shape plus a reduction whose reduced or kept dimensions form one physical run.
///
/// With `kept_run == false` the reduced dimensions are the run; otherwise the
/// kept dimensions are and the reduced set is its (non-empty) complement.
pub fn contiguous_reduction() -> impl Strategy<Value = (Shape, DimensionSet)> {
    shape(5, 1, 12).prop_flat_map(|shape| {
        let rank = shape.rank();
        (Just(shape), 0..rank, 1..=rank, any::<bool>()).prop_filter_map(
            "run must fit and leave a non-empty reduced set",
            |(shape, start, len, kept_run)| {
                if start + len > shape.rank() || (kept_run && len == shape.rank()) {
                    return None;
                }
                let run = DimensionSet::new(
                    shape.layout().major_to_minor()[start..start + len].iter().copied(),
                    shape.rank(),
                )
                .ok()?;
                let reduced = if kept_run {
                    DimensionSet::new(run.complement(shape.rank()).iter(), shape.rank()).ok()?
                } else {
                    run
                };
                Some((shape, reduced))
            },
        )
    })
}

/// Shape of rank >= 4 (no degenerate dimensions) whose reduced and kept
/// dimensions alternate in physical order, so neither set is contiguous.
pub fn interleaved_reduction() -> impl Strategy<Value = (Shape, DimensionSet)> {
    (4usize..=6)
        .prop_flat_map(|rank| (primitive_type(), prop::collection::vec(2usize..=8, rank), layout(rank), any::<bool>()))
        .prop_map(|(element_type, dims, layout, reduce_even)| {
            let rank = dims.len();
            let reduced: Vec<usize> = layout
                .major_to_minor()
                .iter()
                .enumerate()
                .filter(|(pos, _)| (pos % 2 == 0) == reduce_even)
                .map(|(_, &dim)| dim)
                .collect();
            let shape = Shape::new(element_type, dims, layout).expect("ranks agree");
            let reduced = DimensionSet::new(reduced, rank).expect("alternating positions are distinct");
            (shape, reduced)
        })
}
