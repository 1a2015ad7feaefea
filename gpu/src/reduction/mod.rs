//! Reduction analysis: contiguity, geometry, tiling and race freedom.
//!
//! The stages run in order for every reduce that is emitted as a tiled
//! kernel:
//!
//! ```text
//! contiguity -> geometry -> tiling -> race freedom
//! ```
//!
//! [`plan_reduction`](crate::plan::plan_reduction) runs the whole chain.

pub mod contiguity;
pub mod geometry;
pub mod race;
pub mod tiling;

pub use contiguity::{
    are_dimensions_consecutive, is_contiguous_reduction, is_reduction_from_or_to_contiguous_dimensions,
};
pub use geometry::{ReductionGeometry, reduction_geometry_of, reduction_kind_and_contiguous_components};
pub use race::{ThreadGrid, reduction_is_race_free, reduction_thread_grid};
pub use tiling::{TilingFactors, reduction_tiling, reduction_tiling_for_input};

use vesta_ir::Instruction;

use crate::DeviceCapability;

/// Returns true if the tiled reduction emitter beats the elemental (loop)
/// emitter for this geometry.
///
/// Row reductions need at least a warp of elements per row. The column rule
/// was found by sweeping small column reductions.
pub fn is_unnested_reduction_faster_than_elemental(geometry: &ReductionGeometry, device: &DeviceCapability) -> bool {
    let warp = device.warp_size;
    if geometry.is_row_reduction {
        return geometry.width() >= warp;
    }

    let major = geometry.height();
    let minor = geometry.width();
    let prefer_elemental = major < warp
        || (major < 2 * warp && minor < warp)
        || (major < 4 * warp && minor < 8)
        || (major < 8 * warp && minor < 3);
    !prefer_elemental
}

/// Returns true if `instr` is a reduce the tiled reduction emitter should handle.
pub fn is_reduction_eligible_for_tiled_emission(instr: &Instruction, device: &DeviceCapability) -> bool {
    is_contiguous_reduction(instr)
        && reduction_geometry_of(instr)
            .is_some_and(|geometry| is_unnested_reduction_faster_than_elemental(&geometry, device))
}
