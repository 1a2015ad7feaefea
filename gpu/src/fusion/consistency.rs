//! Consistency of the outputs of a multi-output reduction fusion.
//!
//! All outputs of a reduction fusion are written by the same kernel, so they
//! must agree on the iteration space chosen for the first reduction.

use vesta_ir::Instruction;

use crate::reduction::{is_contiguous_reduction, reduction_geometry_of};

/// Returns whether `output` can be emitted in the kernel planned for the
/// reduction `reference`.
///
/// Another contiguous reduction must match `reference` exactly: geometry,
/// reduced dimensions, and input and output shapes including element types.
/// Any other output must cover the same elements as the reference's input,
/// with the same layout.
pub fn is_fused_reduction_output_consistent(output: &Instruction, reference: &Instruction) -> bool {
    debug_assert!(reference.op().is_reduce(), "reference {reference} is not a reduce");
    let Some(reference_input) = reference.operand_shape(0) else {
        return false;
    };

    if is_contiguous_reduction(output) {
        let same_operands = output.operands().len() == reference.operands().len()
            && output
                .operands()
                .iter()
                .zip(reference.operands())
                .all(|(a, b)| a.shape == b.shape);
        return same_operands
            && output.shape() == reference.shape()
            && output.reduced_dimensions() == reference.reduced_dimensions()
            && reduction_geometry_of(output) == reduction_geometry_of(reference);
    }

    output.shape().compatible_ignoring_element_type(reference_input)
        && output.shape().layout() == reference_input.layout()
}

/// Returns whether every instruction in `outputs` is consistent with `reference`.
pub fn all_outputs_consistent<'a>(
    outputs: impl IntoIterator<Item = &'a Instruction>,
    reference: &Instruction,
) -> bool {
    outputs.into_iter().all(|output| is_fused_reduction_output_consistent(output, reference))
}
