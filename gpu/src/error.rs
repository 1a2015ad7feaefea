//! Error types for GPU emission analysis.

use snafu::Snafu;
use vesta_ir::ValueId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported to the caller of the analysis.
///
/// None of these are fatal: a caller can always fall back to generic code
/// generation.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Custom call in the cuDNN convolution family with an unknown target.
    #[snafu(display("unrecognized convolution call target: {target}"))]
    UnrecognizedConvolutionTarget { target: String },

    /// Custom call in the cuDNN batch-norm family with an unknown target.
    #[snafu(display("unrecognized batch normalization call target: {target}"))]
    UnrecognizedBatchNormTarget { target: String },

    /// Custom call in the cuSolver family with an unknown target.
    #[snafu(display("unrecognized cuSolver call target: {target}"))]
    UnrecognizedSolverTarget { target: String },

    /// Instruction is not a convolution custom call.
    #[snafu(display("{value} is not a cuDNN convolution call (op: {op})"))]
    NotAConvolutionCall { value: ValueId, op: String },

    /// Value is neither bound to an allocation nor a view of one.
    #[snafu(display("value {value} not found in allocation table"))]
    ValueNotFound { value: ValueId },

    /// Value is bound, but its binding does not fit its allocation.
    #[snafu(display(
        "value {value} maps to bytes [{offset}, {offset} + {size}) of allocation {allocation} with size {allocation_size}"
    ))]
    InvalidSlice { value: ValueId, allocation: usize, offset: usize, size: usize, allocation_size: usize },

    /// Binding refers to an allocation index missing from the table.
    #[snafu(display("value {value} refers to unknown allocation {allocation}"))]
    UnknownAllocation { value: ValueId, allocation: usize },

    /// View chain loops back on itself.
    #[snafu(display("view chain of value {value} is cyclic"))]
    CyclicView { value: ValueId },

    /// Error from the IR layer.
    #[snafu(display("IR error: {source}"))]
    Ir {
        #[snafu(source)]
        source: vesta_ir::Error,
    },
}

impl From<vesta_ir::Error> for Error {
    fn from(source: vesta_ir::Error) -> Self {
        Self::Ir { source }
    }
}
