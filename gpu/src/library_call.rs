//! Classification of instructions lowered to vendor library calls.
//!
//! Library calls are recognised either structurally (a dot whose shapes a
//! GEMM routine accepts) or by the target string of a custom call. Targets
//! are matched by family prefix first, so a call into a known family with an
//! unknown member is reported instead of silently treated as a non-library
//! instruction.

use std::fmt;

use snafu::ensure;
use vesta_dtype::PrimitiveType;
use vesta_ir::{Instruction, Op, Shape};

use crate::{Result, error::*};

// ============================================================================
// CALL TARGETS
// ============================================================================

pub const GEMM_CALL_TARGET: &str = "__cublas$gemm";

pub const CUDNN_CONV_FORWARD_CALL_TARGET: &str = "__cudnn$convForward";
pub const CUDNN_CONV_BACKWARD_INPUT_CALL_TARGET: &str = "__cudnn$convBackwardInput";
pub const CUDNN_CONV_BACKWARD_FILTER_CALL_TARGET: &str = "__cudnn$convBackwardFilter";
pub const CUDNN_CONV_BIAS_ACTIVATION_FORWARD_CALL_TARGET: &str = "__cudnn$convBiasActivationForward";

pub const CUDNN_BATCH_NORM_FORWARD_INFERENCE_CALL_TARGET: &str = "__cudnn$batchNormalizationForwardInference";
pub const CUDNN_BATCH_NORM_FORWARD_TRAINING_CALL_TARGET: &str = "__cudnn$batchNormalizationForwardTraining";
pub const CUDNN_BATCH_NORM_BACKWARD_CALL_TARGET: &str = "__cudnn$batchNormalizationBackward";

pub const CUSOLVER_CHOLESKY_CALL_TARGET: &str = "__cusolver$cholesky";

/// Prefix shared by every cuDNN convolution target.
pub const CUDNN_CONV_FAMILY_PREFIX: &str = "__cudnn$conv";
/// Prefix shared by every cuDNN batch-norm target.
pub const CUDNN_BATCH_NORM_FAMILY_PREFIX: &str = "__cudnn$batchNormalization";
/// Prefix shared by every cuSolver target.
pub const CUSOLVER_FAMILY_PREFIX: &str = "__cusolver$";

// ============================================================================
// KINDS
// ============================================================================

/// Flavor of a cuDNN convolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CudnnConvKind {
    Forward,
    BackwardInput,
    BackwardFilter,
    /// Convolution + bias + activation in one call.
    ForwardActivation,
}

impl CudnnConvKind {
    pub const ALL: [Self; 4] = [Self::Forward, Self::BackwardInput, Self::BackwardFilter, Self::ForwardActivation];

    pub const fn call_target(self) -> &'static str {
        match self {
            Self::Forward => CUDNN_CONV_FORWARD_CALL_TARGET,
            Self::BackwardInput => CUDNN_CONV_BACKWARD_INPUT_CALL_TARGET,
            Self::BackwardFilter => CUDNN_CONV_BACKWARD_FILTER_CALL_TARGET,
            Self::ForwardActivation => CUDNN_CONV_BIAS_ACTIVATION_FORWARD_CALL_TARGET,
        }
    }

    /// Kind named by `target`, or `None` if it is not a known convolution target.
    pub fn from_call_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.call_target() == target)
    }
}

impl fmt::Display for CudnnConvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::BackwardInput => "backward_input",
            Self::BackwardFilter => "backward_filter",
            Self::ForwardActivation => "fused convolution forward",
        })
    }
}

/// Flavor of a cuDNN batch-norm call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CudnnBatchNormKind {
    ForwardInference,
    ForwardTraining,
    Backward,
}

impl CudnnBatchNormKind {
    pub const ALL: [Self; 3] = [Self::ForwardInference, Self::ForwardTraining, Self::Backward];

    pub const fn call_target(self) -> &'static str {
        match self {
            Self::ForwardInference => CUDNN_BATCH_NORM_FORWARD_INFERENCE_CALL_TARGET,
            Self::ForwardTraining => CUDNN_BATCH_NORM_FORWARD_TRAINING_CALL_TARGET,
            Self::Backward => CUDNN_BATCH_NORM_BACKWARD_CALL_TARGET,
        }
    }

    pub fn from_call_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.call_target() == target)
    }
}

impl fmt::Display for CudnnBatchNormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ForwardInference => "forward_inference",
            Self::ForwardTraining => "forward_training",
            Self::Backward => "backward",
        })
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// How an instruction maps onto a vendor library, if at all.
///
/// Exactly one variant applies to any instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallClassification {
    NotALibraryCall,
    /// Dot not yet rewritten into a GEMM call, but with shapes GEMM accepts.
    MatrixMultiplication,
    Gemm,
    Convolution(CudnnConvKind),
    BatchNorm(CudnnBatchNormKind),
    CholeskyDecomposition,
}

impl CallClassification {
    pub fn is_library_call(&self) -> bool {
        !matches!(self, Self::NotALibraryCall)
    }

    /// Custom-call target of the routine, `None` when no custom call is involved.
    pub fn call_target(&self) -> Option<&'static str> {
        match self {
            Self::NotALibraryCall | Self::MatrixMultiplication => None,
            Self::Gemm => Some(GEMM_CALL_TARGET),
            Self::Convolution(kind) => Some(kind.call_target()),
            Self::BatchNorm(kind) => Some(kind.call_target()),
            Self::CholeskyDecomposition => Some(CUSOLVER_CHOLESKY_CALL_TARGET),
        }
    }
}

impl fmt::Display for CallClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotALibraryCall => f.write_str("not a library call"),
            Self::MatrixMultiplication => f.write_str("matrix multiplication"),
            Self::Gemm => f.write_str("gemm"),
            Self::Convolution(kind) => write!(f, "convolution ({kind})"),
            Self::BatchNorm(kind) => write!(f, "batch norm ({kind})"),
            Self::CholeskyDecomposition => f.write_str("cholesky"),
        }
    }
}

/// Classify `instr` as a library call.
///
/// # Errors
/// Returns an error for a custom call whose target belongs to a known
/// library family but names no routine in it.
pub fn classify_call(instr: &Instruction) -> Result<CallClassification> {
    let classification = match instr.op() {
        Op::CustomCall { target } => classify_call_target(target)?,
        Op::Dot(_) if is_matrix_multiplication(instr) => CallClassification::MatrixMultiplication,
        _ => CallClassification::NotALibraryCall,
    };

    tracing::debug!(value = %instr.id(), op = instr.op().name(), %classification, "classified call");
    Ok(classification)
}

fn classify_call_target(target: &str) -> Result<CallClassification> {
    if target == GEMM_CALL_TARGET {
        return Ok(CallClassification::Gemm);
    }
    if target.starts_with(CUDNN_CONV_FAMILY_PREFIX) {
        return CudnnConvKind::from_call_target(target)
            .map(CallClassification::Convolution)
            .ok_or_else(|| UnrecognizedConvolutionTargetSnafu { target }.build());
    }
    if target.starts_with(CUDNN_BATCH_NORM_FAMILY_PREFIX) {
        return CudnnBatchNormKind::from_call_target(target)
            .map(CallClassification::BatchNorm)
            .ok_or_else(|| UnrecognizedBatchNormTargetSnafu { target }.build());
    }
    if target.starts_with(CUSOLVER_FAMILY_PREFIX) {
        ensure!(target == CUSOLVER_CHOLESKY_CALL_TARGET, UnrecognizedSolverTargetSnafu { target });
        return Ok(CallClassification::CholeskyDecomposition);
    }
    Ok(CallClassification::NotALibraryCall)
}

// ============================================================================
// PREDICATES
// ============================================================================

/// Returns true if a GEMM routine accepts `lhs x rhs -> output` with
/// `batch_dimensions` leading batch dimensions.
pub fn are_valid_gemm_shapes(lhs: &Shape, rhs: &Shape, output: &Shape, batch_dimensions: usize) -> bool {
    let output_type = output.element_type();
    let type_supported = matches!(
        output_type,
        PrimitiveType::F16
            | PrimitiveType::BF16
            | PrimitiveType::F32
            | PrimitiveType::F64
            | PrimitiveType::C64
            | PrimitiveType::C128
    ) || (output_type == PrimitiveType::S32
        && lhs.element_type() == PrimitiveType::S8
        && rhs.element_type() == PrimitiveType::S8);

    let rank = batch_dimensions + 2;
    type_supported
        && lhs.rank() == rank
        && rhs.rank() == rank
        && output.rank() == rank
        && !lhs.is_zero_element()
        && !rhs.is_zero_element()
}

/// Returns true if `instr` is a dot that can be lowered to a GEMM call.
pub fn is_matrix_multiplication(instr: &Instruction) -> bool {
    let Op::Dot(numbers) = instr.op() else {
        return false;
    };
    let (Some(lhs), Some(rhs)) = (instr.operand_shape(0), instr.operand_shape(1)) else {
        return false;
    };

    debug_assert!(
        numbers
            .lhs_contracting
            .iter()
            .zip(&numbers.rhs_contracting)
            .all(|(&l, &r)| l >= lhs.rank() || r >= rhs.rank() || lhs.dimension(l) == rhs.dimension(r)),
        "contracting dimensions of {instr} disagree"
    );

    are_valid_gemm_shapes(lhs, rhs, instr.shape(), numbers.batch_size())
}

pub fn is_cublas_gemm(instr: &Instruction) -> bool {
    instr.custom_call_target() == Some(GEMM_CALL_TARGET)
}

/// Returns true for a custom call to any known cuDNN convolution routine.
pub fn is_custom_call_to_dnn_convolution(instr: &Instruction) -> bool {
    instr.custom_call_target().and_then(CudnnConvKind::from_call_target).is_some()
}

/// Returns true for a custom call to any known cuDNN batch-norm routine.
pub fn is_custom_call_to_dnn_batch_norm(instr: &Instruction) -> bool {
    instr.custom_call_target().and_then(CudnnBatchNormKind::from_call_target).is_some()
}

/// Returns true for a custom call to a known cuSolver routine.
pub fn is_custom_call_to_cusolver(instr: &Instruction) -> bool {
    instr.custom_call_target() == Some(CUSOLVER_CHOLESKY_CALL_TARGET)
}

/// Convolution kind of a cuDNN convolution custom call.
///
/// # Errors
/// [`Error::NotAConvolutionCall`](crate::Error::NotAConvolutionCall) if
/// `instr` is not a custom call in the convolution family, and
/// [`Error::UnrecognizedConvolutionTarget`](crate::Error::UnrecognizedConvolutionTarget)
/// for an unknown member of it.
pub fn cudnn_conv_kind(instr: &Instruction) -> Result<CudnnConvKind> {
    let target = instr
        .custom_call_target()
        .filter(|target| target.starts_with(CUDNN_CONV_FAMILY_PREFIX))
        .ok_or_else(|| NotAConvolutionCallSnafu { value: instr.id(), op: instr.op().to_string() }.build())?;
    CudnnConvKind::from_call_target(target).ok_or_else(|| UnrecognizedConvolutionTargetSnafu { target }.build())
}
