//! Contiguity of reduced and kept dimensions in physical order.
//!
//! Fast reduction emission only handles three physical patterns: `(K, R)`,
//! `(K, R, K)` and `(R, K, R)`. All of them reduce to "the reduced dimensions
//! or the kept dimensions form one unbroken physical run", which is what this
//! module checks. Size-1 dimensions are elided first since they cannot break
//! a run.

use itertools::Itertools;
use smallvec::SmallVec;
use vesta_ir::{DimensionSet, Instruction, Shape};

/// Returns true if the non-degenerate dimensions among `dims` occupy
/// consecutive positions in the physical major-to-minor order of `shape`.
///
/// Size-1 dimensions are removed from the physical order before positions
/// are assigned. An empty selection is trivially consecutive.
pub fn are_dimensions_consecutive(shape: &Shape, dims: &[usize]) -> bool {
    let positions: SmallVec<[usize; 4]> = shape
        .physical_dimensions()
        .filter(|&(_, size)| size != 1)
        .enumerate()
        .filter(|(_, (dim, _))| dims.contains(dim))
        .map(|(position, _)| position)
        .collect();

    positions.iter().tuple_windows().all(|(prev, next)| next - prev == 1)
}

/// Returns true if either the reduced dimensions or the kept dimensions of
/// a reduction over `shape` are contiguous in physical order.
///
/// `reduced` must be a non-empty set of dimensions of `shape`; anything else
/// is a caller bug and trips a debug assertion.
pub fn is_reduction_from_or_to_contiguous_dimensions(shape: &Shape, reduced: &DimensionSet) -> bool {
    debug_assert!(!reduced.is_empty(), "reduction over no dimensions");
    debug_assert!(
        reduced.max().is_some_and(|dim| dim < shape.rank()),
        "reduced dimensions {reduced} out of range for {shape}"
    );

    let kept = reduced.complement(shape.rank());
    are_dimensions_consecutive(shape, kept.as_slice()) || are_dimensions_consecutive(shape, reduced.as_slice())
}

/// Returns true if `instr` is a reduce whose input passes
/// [`is_reduction_from_or_to_contiguous_dimensions`].
pub fn is_contiguous_reduction(instr: &Instruction) -> bool {
    match (instr.reduced_dimensions(), instr.operand_shape(0)) {
        (Some(reduced), Some(input)) => is_reduction_from_or_to_contiguous_dimensions(input, reduced),
        _ => false,
    }
}
