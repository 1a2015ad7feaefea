//! Thread grid of a tiled reduction and the race-freedom check.
//!
//! A reduction can be emitted without atomics only if every output element
//! is produced by exactly one block: the reduced bands must be covered by a
//! single block, and (conservatively) every reduced band must split evenly
//! into tiles.

use super::{ReductionGeometry, TilingFactors};
use crate::DeviceCapability;

/// Launch shape implied by a geometry and tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadGrid {
    /// Threads per block along x.
    pub threads_x: usize,
    /// Threads per block along y.
    pub threads_y: usize,
    /// Total blocks.
    pub blocks: usize,
    /// Blocks that contribute to any one output element.
    pub blocks_per_output: usize,
}

impl ThreadGrid {
    pub fn threads_per_block(&self) -> usize {
        self.threads_x * self.threads_y
    }
}

/// Thread grid for the given reduction.
///
/// Row reductions use one block per output row: up to
/// `min_threads_x_row_reduction` threads along x, each reading `tile_width`
/// elements. Column reductions use a block one warp wide and up to one warp
/// tall that reads `tile_height` rows per thread. Blocks never exceed
/// `max_threads_per_block`.
pub fn reduction_thread_grid(
    geometry: &ReductionGeometry,
    tiling: &TilingFactors,
    device: &DeviceCapability,
) -> ThreadGrid {
    debug_assert!(tiling.0.iter().all(|&t| t > 0), "tiling {tiling} has a zero factor");

    let warp = device.warp_size.max(1);
    let max_threads = device.max_threads_per_block.max(1);
    let [depth, height, width] = geometry.dimensions;
    let [tile_depth, tile_height, tile_width] = tiling.0.map(|t| t.max(1));

    if geometry.is_row_reduction {
        let threads_x = device
            .limits
            .min_threads_x_row_reduction
            .min(max_threads)
            .min(width.div_ceil(tile_width).next_multiple_of(warp))
            .max(1);
        let blocks_depth = depth.div_ceil(tile_depth);
        let blocks_width = width.div_ceil(threads_x * tile_width);
        ThreadGrid {
            threads_x,
            threads_y: 1,
            blocks: blocks_depth * height * blocks_width,
            blocks_per_output: blocks_depth * blocks_width,
        }
    } else {
        let threads_x = warp.min(max_threads);
        let threads_y = (max_threads / threads_x).clamp(1, warp);
        let blocks_height = height.div_ceil(threads_y * tile_height);
        let blocks_width = width.div_ceil(threads_x);
        ThreadGrid {
            threads_x,
            threads_y,
            blocks: depth * blocks_height * blocks_width,
            blocks_per_output: blocks_height,
        }
    }
}

/// Returns whether the reduction can be emitted without atomics: at most one
/// block writes every output element.
///
/// Returns `false` whenever a reduced band's tile does not evenly divide the
/// band, and for batched row reductions deeper than
/// `batched_race_free_bound`.
pub fn reduction_is_race_free(
    geometry: &ReductionGeometry,
    tiling: &TilingFactors,
    device: &DeviceCapability,
) -> bool {
    let [depth, height, width] = geometry.dimensions;
    let [tile_depth, tile_height, tile_width] = tiling.0;
    if tiling.0.contains(&0) {
        return false;
    }

    let evenly_tiled = if geometry.is_row_reduction {
        width % tile_width == 0 && depth % tile_depth == 0 && depth <= device.limits.batched_race_free_bound
    } else {
        height % tile_height == 0
    };

    let grid = reduction_thread_grid(geometry, tiling, device);
    let race_free = evenly_tiled && grid.blocks_per_output == 1;

    tracing::debug!(%geometry, %tiling, blocks_per_output = grid.blocks_per_output, race_free, "race freedom");
    race_free
}
