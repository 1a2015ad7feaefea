//! Choice of emission strategy for instructions and fusions.
//!
//! ```text
//! instruction ──► library call? ──yes──► LibraryCall
//!                     │ no
//!                     ▼
//!              contiguous reduce, faster than elemental? ──yes──► ReductionKernel
//!                     │ no
//!                     ▼
//!                 Elemental
//! ```

use std::fmt;

use vesta_dtype::PrimitiveType;
use vesta_ir::{DimensionSet, Fusion, Instruction, Shape};

use crate::allocation::AllocationTable;
use crate::fusion::{
    FusionLayoutAnalysis, all_outputs_consistent, can_emit_fused_dynamic_update_slice_in_place,
    is_input_fusible_slices,
};
use crate::library_call::{CallClassification, classify_call};
use crate::reduction::{
    ReductionGeometry, ThreadGrid, TilingFactors, is_reduction_from_or_to_contiguous_dimensions,
    is_unnested_reduction_faster_than_elemental, reduction_is_race_free, reduction_kind_and_contiguous_components,
    reduction_thread_grid, reduction_tiling_for_input,
};
use crate::{DeviceCapability, Result};

/// Everything needed to emit one tiled reduction kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionPlan {
    pub geometry: ReductionGeometry,
    pub tiling: TilingFactors,
    pub grid: ThreadGrid,
    pub race_free: bool,
}

impl ReductionPlan {
    /// Output elements are combined across blocks and must be written with atomics.
    pub fn needs_atomics(&self) -> bool {
        !self.race_free
    }
}

impl fmt::Display for ReductionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tiled {} on {} blocks", self.geometry, self.tiling, self.grid.blocks)?;
        if self.needs_atomics() {
            write!(f, " (atomic)")?;
        }
        Ok(())
    }
}

/// How a single instruction is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmissionStrategy {
    LibraryCall(CallClassification),
    ReductionKernel(ReductionPlan),
    /// Generic per-element loop.
    Elemental,
}

/// How a fusion is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FusionPlan {
    Reduction(ReductionPlan),
    /// Dynamic-update-slice writing into its own input buffer.
    InPlaceDynamicUpdateSlice,
    /// Roots are unit-strided slices of the inputs.
    InputSlices,
    Loop,
}

/// Plan a tiled kernel for reducing `input` over `reduced`.
///
/// Returns `None` when neither the reduced nor the kept dimensions are
/// contiguous, or when the elemental emitter would be faster.
pub fn plan_reduction(
    input: &Shape,
    reduced: &DimensionSet,
    device: &DeviceCapability,
    smallest_input: Option<PrimitiveType>,
) -> Option<ReductionPlan> {
    if !is_reduction_from_or_to_contiguous_dimensions(input, reduced) {
        return None;
    }
    let geometry = reduction_kind_and_contiguous_components(input, reduced);
    if !is_unnested_reduction_faster_than_elemental(&geometry, device) {
        tracing::debug!(%geometry, "elemental emission is faster");
        return None;
    }

    let tiling = reduction_tiling_for_input(&geometry, device, smallest_input);
    let grid = reduction_thread_grid(&geometry, &tiling, device);
    let race_free = reduction_is_race_free(&geometry, &tiling, device);
    Some(ReductionPlan { geometry, tiling, grid, race_free })
}

/// Choose how to emit an unfused instruction.
///
/// # Errors
/// Fails only for custom calls into a known library family with an unknown target.
#[tracing::instrument(skip_all, fields(value = %instr.id(), op = instr.op().name()))]
pub fn plan_instruction(instr: &Instruction, device: &DeviceCapability) -> Result<EmissionStrategy> {
    let classification = classify_call(instr)?;
    if classification.is_library_call() {
        return Ok(EmissionStrategy::LibraryCall(classification));
    }

    let reduction = instr.reduced_dimensions().zip(instr.operand_shape(0)).and_then(|(reduced, input)| {
        plan_reduction(input, reduced, device, Some(input.element_type()))
    });

    let strategy = match reduction {
        Some(plan) => EmissionStrategy::ReductionKernel(plan),
        None => EmissionStrategy::Elemental,
    };
    tracing::debug!(?strategy, "planned instruction");
    Ok(strategy)
}

/// Choose how to emit a fusion.
///
/// A reduction root commits the whole fusion to a reduction kernel only if
/// every root is consistent with the first reduction root that can be tiled.
///
/// # Errors
/// Fails if a root value is not defined in the fusion.
#[tracing::instrument(skip_all, fields(fusion = fusion.name(), roots = fusion.root_values().len()))]
pub fn plan_fusion(fusion: &Fusion, device: &DeviceCapability, table: &AllocationTable) -> Result<FusionPlan> {
    if can_emit_fused_dynamic_update_slice_in_place(fusion, table) {
        tracing::debug!("in-place dynamic-update-slice");
        return Ok(FusionPlan::InPlaceDynamicUpdateSlice);
    }

    let layouts = FusionLayoutAnalysis::new(fusion);
    let roots = fusion
        .root_values()
        .iter()
        .map(|&root| fusion.require(root).map(|inst| layouts.resolve(inst)))
        .collect::<vesta_ir::Result<Vec<_>>>()?;
    let smallest_input = PrimitiveType::narrowest(fusion.parameters().iter().map(|param| param.shape().element_type()));

    let first_reduction = roots.iter().find_map(|root| {
        let reduced = root.reduced_dimensions()?;
        let input = root.operand_shape(0)?;
        plan_reduction(input, reduced, device, smallest_input).map(|plan| (root, plan))
    });

    if let Some((reference, plan)) = first_reduction {
        if all_outputs_consistent(&roots, reference) {
            tracing::debug!(%plan, "reduction fusion");
            return Ok(FusionPlan::Reduction(plan));
        }
        tracing::debug!(reference = %reference.id(), "fusion outputs disagree with the first reduction");
        return Ok(FusionPlan::Loop);
    }

    if is_input_fusible_slices(fusion, true) {
        return Ok(FusionPlan::InputSlices);
    }
    Ok(FusionPlan::Loop)
}
