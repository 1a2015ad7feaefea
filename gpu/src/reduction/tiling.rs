//! Per-thread tiling of a reduction.

use std::fmt;

use vesta_dtype::PrimitiveType;

use super::ReductionGeometry;
use crate::DeviceCapability;

/// Row tile for 16-bit inputs on compute capability 6.0 and newer.
const HALF_WIDTH_ROW_UNROLL: usize = 16;
/// Row tile for 8-bit inputs on compute capability 6.0 and newer.
const BYTE_WIDTH_ROW_UNROLL: usize = 64;

/// Elements of each band processed sequentially by one thread,
/// `[depth, height, width]`.
///
/// Every factor is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilingFactors(pub [usize; 3]);

impl TilingFactors {
    pub const fn depth(&self) -> usize {
        self.0[0]
    }

    pub const fn height(&self) -> usize {
        self.0[1]
    }

    pub const fn width(&self) -> usize {
        self.0[2]
    }

    /// Elements one thread accumulates before combining with other threads.
    pub fn elements_per_thread(&self) -> usize {
        self.0.iter().product()
    }
}

impl fmt::Display for TilingFactors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [depth, height, width] = self.0;
        write!(f, "[{depth},{height},{width}]")
    }
}

/// Tiling per thread for a reduction in dimensions `[D, H, W]`.
///
/// Equivalent to [`reduction_tiling_for_input`] without input type information.
pub fn reduction_tiling(geometry: &ReductionGeometry, device: &DeviceCapability) -> TilingFactors {
    reduction_tiling_for_input(geometry, device, None)
}

/// Tiling per thread, taking the narrowest input element type into account.
///
/// Row reductions tile along `width` so each thread reads several
/// contiguous elements before the warp-shuffle tree reduction, and batch up
/// to `batched_race_free_bound` rows along `depth`. Column reductions tile
/// along the reduced `height` band, since they cannot use shuffles across the
/// reduced dimension. Every factor is clamped into `[1, dimension]`.
pub fn reduction_tiling_for_input(
    geometry: &ReductionGeometry,
    device: &DeviceCapability,
    smallest_input: Option<PrimitiveType>,
) -> TilingFactors {
    let limits = &device.limits;
    let [depth, height, width] = geometry.dimensions;

    let raw = if geometry.is_row_reduction {
        let tile_depth = depth.min(limits.batched_race_free_bound);
        let wide_row = device.warp_size * device.warp_size * limits.wide_row_unroll;
        let tile_width = if wide_row > 0 && width % wide_row == 0 {
            limits.wide_row_unroll
        } else {
            row_unroll(device, smallest_input)
        };
        [tile_depth, 1, tile_width]
    } else {
        [1, limits.column_tile_height, 1]
    };

    let mut factors = [1; 3];
    for ((factor, tile), extent) in factors.iter_mut().zip(raw).zip(geometry.dimensions) {
        *factor = tile.min(extent).max(1);
    }

    tracing::debug!(%geometry, tiling = ?factors, device = %device.device, "selected reduction tiling");
    TilingFactors(factors)
}

fn row_unroll(device: &DeviceCapability, smallest_input: Option<PrimitiveType>) -> usize {
    if !device.compute_capability.is_at_least(6, 0) {
        return device.limits.row_unroll;
    }
    match smallest_input.map(|ty| ty.bits()) {
        Some(16) => HALF_WIDTH_ROW_UNROLL,
        Some(8) => BYTE_WIDTH_ROW_UNROLL,
        _ => device.limits.row_unroll,
    }
}
