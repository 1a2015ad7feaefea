use smallvec::SmallVec;
use snafu::Snafu;

use crate::ValueId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Layout is not a permutation of the shape's dimensions.
    #[snafu(display("invalid layout {major_to_minor:?}: expected a permutation of 0..{rank}"))]
    InvalidLayout { major_to_minor: SmallVec<[usize; 4]>, rank: usize },

    /// Layout rank differs from the number of dimensions.
    #[snafu(display("layout rank mismatch: shape has {shape_rank} dimensions, layout has {layout_rank}"))]
    LayoutRankMismatch { shape_rank: usize, layout_rank: usize },

    /// Dimension index is not a valid logical dimension.
    #[snafu(display("dimension {dim} out of range for rank {rank}"))]
    DimensionOutOfRange { dim: usize, rank: usize },

    /// Dimension listed more than once.
    #[snafu(display("duplicate dimension {dim}"))]
    DuplicateDimension { dim: usize },

    /// Reduction over no dimensions.
    #[snafu(display("dimension set must not be empty"))]
    EmptyDimensionSet,

    /// Value referenced before (or without) being defined.
    #[snafu(display("unknown value {value} in fusion {fusion}"))]
    UnknownValue { value: ValueId, fusion: String },

    /// Value defined twice.
    #[snafu(display("value {value} defined more than once in fusion {fusion}"))]
    DuplicateValue { value: ValueId, fusion: String },

    /// Parameter does not carry a `Parameter` op or has the wrong number.
    #[snafu(display("parameter {value} of fusion {fusion} must be parameter number {expected}"))]
    MisnumberedParameter { value: ValueId, expected: usize, fusion: String },

    /// Count mismatch between two lists that must pair up.
    #[snafu(display("fusion {fusion}: {what} has {actual} entries, expected {expected}"))]
    ArityMismatch { what: &'static str, expected: usize, actual: usize, fusion: String },

    /// Fusion without results.
    #[snafu(display("fusion {fusion} has no roots"))]
    NoRoots { fusion: String },
}
