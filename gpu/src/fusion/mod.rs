//! Analyses over fusion regions.

pub mod consistency;
pub mod layout;
pub mod slices;

pub use consistency::{all_outputs_consistent, is_fused_reduction_output_consistent};
pub use layout::FusionLayoutAnalysis;
pub use slices::{can_emit_fused_dynamic_update_slice_in_place, is_input_fusible_slices};
