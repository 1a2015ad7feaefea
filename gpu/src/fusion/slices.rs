//! Shape checks for slice and dynamic-update-slice fusions.

use vesta_ir::{Fusion, Op};

use crate::allocation::{AllocationTable, resolve_slice};

/// Returns whether every root of `fusion` is a slice.
///
/// With `verify_no_strides`, slices with a stride other than 1 are rejected.
pub fn is_input_fusible_slices(fusion: &Fusion, verify_no_strides: bool) -> bool {
    fusion.roots().all(|root| match root.op() {
        Op::Slice(bounds) => !verify_no_strides || bounds.is_unit_strided(),
        _ => false,
    })
}

/// Returns whether a dynamic-update-slice fusion can update its buffer in place.
///
/// That holds when the single root is a dynamic-update-slice whose updated
/// operand is a fusion parameter backed by the same slice as the fusion's
/// output buffer. Any failure to resolve either slice gives `false`.
pub fn can_emit_fused_dynamic_update_slice_in_place(fusion: &Fusion, table: &AllocationTable) -> bool {
    let ([root], [output]) = (fusion.root_values(), fusion.output_buffers()) else {
        return false;
    };
    let Some(dus) = fusion.get(*root).filter(|inst| matches!(inst.op(), Op::DynamicUpdateSlice)) else {
        return false;
    };
    let Some(argument) = dus
        .operand(0)
        .and_then(|updated| fusion.parameter_number(updated.value))
        .and_then(|number| fusion.argument(number))
    else {
        return false;
    };

    match (resolve_slice(argument.value, table), resolve_slice(output.value, table)) {
        (Ok(updated), Ok(output)) => updated.slice == output.slice,
        (updated, output) => {
            tracing::debug!(
                fusion = fusion.name(),
                updated = ?updated.err(),
                output = ?output.err(),
                "cannot resolve dynamic-update-slice buffers"
            );
            false
        }
    }
}
