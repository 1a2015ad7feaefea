//! Collapse of a contiguous reduction into a 3-D `[depth, height, width]` problem.
//!
//! Once the reduced (or kept) dimensions are known to be one physical run,
//! every reduction is equivalent to one of two canonical forms:
//!
//! ```text
//! row:    [D, H, W] -> [H]     W is reduced, D is reduced or 1
//! column: [D, H, W] -> [D, W]  H is reduced
//! ```

use std::fmt;

use itertools::Itertools;
use smallvec::SmallVec;
use vesta_ir::{DimensionSet, Instruction, Shape};

/// Kind and contiguous components of a reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReductionGeometry {
    /// Row reductions reduce `width`; column reductions reduce `height`.
    pub is_row_reduction: bool,
    /// `[depth, height, width]`, major to minor.
    pub dimensions: [usize; 3],
}

impl ReductionGeometry {
    pub const fn row(depth: usize, height: usize, width: usize) -> Self {
        Self { is_row_reduction: true, dimensions: [depth, height, width] }
    }

    pub const fn column(depth: usize, height: usize, width: usize) -> Self {
        Self { is_row_reduction: false, dimensions: [depth, height, width] }
    }

    pub const fn depth(&self) -> usize {
        self.dimensions[0]
    }

    pub const fn height(&self) -> usize {
        self.dimensions[1]
    }

    pub const fn width(&self) -> usize {
        self.dimensions[2]
    }

    pub fn element_count(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Number of input elements combined into each output element.
    pub fn reduced_extent(&self) -> usize {
        if self.is_row_reduction { self.depth() * self.width() } else { self.height() }
    }

    /// Number of output elements.
    pub fn output_count(&self) -> usize {
        if self.is_row_reduction { self.height() } else { self.depth() * self.width() }
    }
}

impl fmt::Display for ReductionGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_row_reduction { "row" } else { "column" };
        let [depth, height, width] = self.dimensions;
        write!(f, "{kind}[{depth},{height},{width}]")
    }
}

/// Maximal physical run of dimensions that are all reduced or all kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Band {
    reduced: bool,
    size: usize,
}

/// Non-degenerate dimensions of `shape`, coalesced into bands, major to minor.
fn bands(shape: &Shape, reduced: &DimensionSet) -> SmallVec<[Band; 3]> {
    shape
        .physical_dimensions()
        .filter(|&(_, size)| size != 1)
        .map(|(dim, size)| Band { reduced: reduced.contains(dim), size })
        .coalesce(|prev, next| {
            if prev.reduced == next.reduced {
                Ok(Band { reduced: prev.reduced, size: prev.size * next.size })
            } else {
                Err((prev, next))
            }
        })
        .collect()
}

/// Returns the kind and `[depth, height, width]` components of a reduction.
///
/// Prerequisite: the reduction passes
/// [`is_reduction_from_or_to_contiguous_dimensions`](super::is_reduction_from_or_to_contiguous_dimensions),
/// which guarantees at most three bands.
pub fn reduction_kind_and_contiguous_components(shape: &Shape, reduced: &DimensionSet) -> ReductionGeometry {
    let mut bands = bands(shape, reduced);
    debug_assert!(bands.len() <= 3, "reduction of {shape} over {reduced} is not contiguous");

    // Out-of-contract input: fold outer bands into their neighbour.
    while bands.len() > 3 {
        let outer = bands.remove(0);
        bands[0].size *= outer.size;
    }

    tracing::trace!(%shape, %reduced, bands = ?bands, "reduction bands");

    match bands.as_slice() {
        [] => ReductionGeometry::row(1, 1, 1),
        [only] if only.reduced => ReductionGeometry::row(1, 1, only.size),
        [only] => ReductionGeometry::column(1, 1, only.size),
        [kept, minor] if minor.reduced => ReductionGeometry::row(1, kept.size, minor.size),
        [major, kept] => ReductionGeometry::column(1, major.size, kept.size),
        [major, middle, minor] if minor.reduced => ReductionGeometry::row(major.size, middle.size, minor.size),
        [major, middle, minor] => ReductionGeometry::column(major.size, middle.size, minor.size),
        _ => unreachable!("bands folded to at most three"),
    }
}

/// Geometry of a reduce instruction, from its input operand.
///
/// Returns `None` for non-reduce instructions.
pub fn reduction_geometry_of(instr: &Instruction) -> Option<ReductionGeometry> {
    let reduced = instr.reduced_dimensions()?;
    let input = instr.operand_shape(0)?;
    Some(reduction_kind_and_contiguous_components(input, reduced))
}
