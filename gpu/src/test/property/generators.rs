//! Proptest strategies for reduction geometries, tilings and call targets.

use proptest::prelude::*;

use crate::library_call::{CUSOLVER_CHOLESKY_CALL_TARGET, CudnnBatchNormKind, CudnnConvKind, GEMM_CALL_TARGET};
use crate::reduction::{ReductionGeometry, TilingFactors};

/// Geometry with bands in `1..=max`.
pub fn geometry(max: usize) -> impl Strategy<Value = ReductionGeometry> {
    (any::<bool>(), 1..=max, 1..=max, 1..=max)
        .prop_map(|(row, d, h, w)| {
            if row { ReductionGeometry::row(d, h, w) } else { ReductionGeometry::column(d, h, w) }
        })
}

/// Tiling with factors in `1..=max`.
pub fn tiling(max: usize) -> impl Strategy<Value = TilingFactors> {
    (1..=max, 1..=max, 1..=max).prop_map(|(d, h, w)| TilingFactors([d, h, w]))
}

/// Known call targets, near misses within each family, and unrelated names.
pub fn call_target() -> impl Strategy<Value = String> {
    let known: Vec<String> = std::iter::once(GEMM_CALL_TARGET)
        .chain(CudnnConvKind::ALL.map(CudnnConvKind::call_target))
        .chain(CudnnBatchNormKind::ALL.map(CudnnBatchNormKind::call_target))
        .chain(std::iter::once(CUSOLVER_CHOLESKY_CALL_TARGET))
        .map(str::to_string)
        .collect();

    prop_oneof![
        3 => prop::sample::select(known),
        1 => prop::sample::select(vec!["__cudnn$conv", "__cudnn$batchNormalization", "__cusolver$", "__cublas$"])
            .prop_flat_map(|prefix| "[A-Za-z]{0,8}".prop_map(move |suffix| format!("{prefix}{suffix}"))),
        1 => "[a-z_$]{1,16}",
    ]
}
