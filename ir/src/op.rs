//! Operation enum.
//!
//! Each variant carries the attributes the GPU analysis reads for that
//! opcode. Operands live on the [`Instruction`](crate::Instruction), not here.

use std::fmt;

use smallvec::SmallVec;

use crate::DimensionSet;

/// Elementwise operations. Output shape equals every operand's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementwiseOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Maximum,
    Minimum,
    Negate,
    Abs,
    Exp,
    Log,
    Tanh,
    Convert,
    Compare,
    Select,
}

impl ElementwiseOp {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Maximum => "maximum",
            Self::Minimum => "minimum",
            Self::Negate => "negate",
            Self::Abs => "abs",
            Self::Exp => "exponential",
            Self::Log => "log",
            Self::Tanh => "tanh",
            Self::Convert => "convert",
            Self::Compare => "compare",
            Self::Select => "select",
        }
    }
}

/// Contracting and batch dimensions of a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DotDimensionNumbers {
    pub lhs_contracting: SmallVec<[usize; 2]>,
    pub rhs_contracting: SmallVec<[usize; 2]>,
    pub lhs_batch: SmallVec<[usize; 2]>,
    pub rhs_batch: SmallVec<[usize; 2]>,
}

impl DotDimensionNumbers {
    /// Plain `[m, k] x [k, n]` matrix product.
    pub fn matmul() -> Self {
        Self {
            lhs_contracting: smallvec::smallvec![1],
            rhs_contracting: smallvec::smallvec![0],
            lhs_batch: SmallVec::new(),
            rhs_batch: SmallVec::new(),
        }
    }

    /// `[b.., m, k] x [b.., k, n]` with `batch` leading batch dimensions.
    pub fn batched_matmul(batch: usize) -> Self {
        Self {
            lhs_contracting: smallvec::smallvec![batch + 1],
            rhs_contracting: smallvec::smallvec![batch],
            lhs_batch: (0..batch).collect(),
            rhs_batch: (0..batch).collect(),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.lhs_batch.len()
    }
}

/// Slice bounds per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SliceBounds {
    pub starts: SmallVec<[usize; 4]>,
    pub limits: SmallVec<[usize; 4]>,
    pub strides: SmallVec<[usize; 4]>,
}

impl SliceBounds {
    pub fn is_unit_strided(&self) -> bool {
        self.strides.iter().all(|&stride| stride == 1)
    }
}

/// Operation with typed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    // Leaves
    Parameter { number: usize },
    Constant,

    // Data movement
    Broadcast { dimensions: SmallVec<[usize; 4]> },
    Transpose { permutation: SmallVec<[usize; 4]> },
    Reshape,
    Bitcast,
    Copy,
    Slice(SliceBounds),
    DynamicSlice,
    DynamicUpdateSlice,
    Concatenate { dimension: usize },
    Tuple,

    // Compute
    Elementwise(ElementwiseOp),
    Reduce { dimensions: DimensionSet },
    Dot(DotDimensionNumbers),
    Convolution,
    Cholesky,
    BatchNormInference,
    BatchNormTraining,
    BatchNormGrad,

    /// Opaque call into an externally implemented routine.
    CustomCall { target: String },

    /// Nested fusion region.
    Fusion,
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Parameter { .. } => "parameter",
            Self::Constant => "constant",
            Self::Broadcast { .. } => "broadcast",
            Self::Transpose { .. } => "transpose",
            Self::Reshape => "reshape",
            Self::Bitcast => "bitcast",
            Self::Copy => "copy",
            Self::Slice(_) => "slice",
            Self::DynamicSlice => "dynamic-slice",
            Self::DynamicUpdateSlice => "dynamic-update-slice",
            Self::Concatenate { .. } => "concatenate",
            Self::Tuple => "tuple",
            Self::Elementwise(op) => op.name(),
            Self::Reduce { .. } => "reduce",
            Self::Dot(_) => "dot",
            Self::Convolution => "convolution",
            Self::Cholesky => "cholesky",
            Self::BatchNormInference => "batch-norm-inference",
            Self::BatchNormTraining => "batch-norm-training",
            Self::BatchNormGrad => "batch-norm-grad",
            Self::CustomCall { .. } => "custom-call",
            Self::Fusion => "fusion",
        }
    }

    pub fn is_elementwise(&self) -> bool {
        matches!(self, Self::Elementwise(_) | Self::Copy)
    }

    pub fn is_reduce(&self) -> bool {
        matches!(self, Self::Reduce { .. })
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter { .. })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CustomCall { target } => write!(f, "custom-call(\"{target}\")"),
            Self::Reduce { dimensions } => write!(f, "reduce(dimensions={dimensions})"),
            Self::Parameter { number } => write!(f, "parameter({number})"),
            _ => write!(f, "{}", self.name()),
        }
    }
}
