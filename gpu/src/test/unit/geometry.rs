use test_case::test_case;
use vesta_ir::PrimitiveType;

use crate::reduction::{ReductionGeometry, reduction_geometry_of, reduction_kind_and_contiguous_components};
use crate::test::helpers::{custom_call, dims, f32_shape, reduce, shape};

#[test_case(&[8, 1024, 512], &[2] => ReductionGeometry::row(1, 8192, 512); "kept then reduced")]
#[test_case(&[8, 1024, 512], &[0, 1, 2] => ReductionGeometry::row(1, 1, 4_194_304); "full reduction")]
#[test_case(&[8, 1024, 512], &[1] => ReductionGeometry::column(8, 1024, 512); "kept reduced kept")]
#[test_case(&[8, 1024, 512], &[0, 2] => ReductionGeometry::row(8, 1024, 512); "reduced kept reduced")]
#[test_case(&[1024, 512], &[0] => ReductionGeometry::column(1, 1024, 512); "reduced then kept")]
#[test_case(&[16], &[0] => ReductionGeometry::row(1, 1, 16); "vector")]
#[test_case(&[1, 1], &[0] => ReductionGeometry::row(1, 1, 1); "all degenerate")]
#[test_case(&[4, 1, 8], &[0, 1] => ReductionGeometry::column(1, 4, 8); "degenerate dimension elided")]
#[test_case(&[0, 16], &[1] => ReductionGeometry::row(1, 0, 16); "zero sized kept dimension")]
fn test_row_major_geometry(dimensions: &[usize], reduced: &[usize]) -> ReductionGeometry {
    let input = f32_shape(dimensions);
    reduction_kind_and_contiguous_components(&input, &dims(reduced, input.rank()))
}

#[test]
fn test_geometry_follows_layout() {
    // Physical order: d1 (512), d0 (1024).
    let input = shape(PrimitiveType::F32, &[1024, 512], &[1, 0]);
    let geometry = reduction_kind_and_contiguous_components(&input, &dims(&[0], 2));
    assert_eq!(geometry, ReductionGeometry::row(1, 512, 1024));
}

#[test]
fn test_geometry_accessors() {
    let row = ReductionGeometry::row(8, 1024, 512);
    assert_eq!((row.depth(), row.height(), row.width()), (8, 1024, 512));
    assert_eq!(row.reduced_extent(), 8 * 512);
    assert_eq!(row.output_count(), 1024);
    assert_eq!(row.to_string(), "row[8,1024,512]");

    let column = ReductionGeometry::column(8, 1024, 512);
    assert_eq!(column.reduced_extent(), 1024);
    assert_eq!(column.output_count(), 8 * 512);
    assert_eq!(column.element_count(), row.element_count());
    assert_eq!(column.to_string(), "column[8,1024,512]");
}

#[test]
fn test_reduction_geometry_of() {
    let instr = reduce(f32_shape(&[8, 1024, 512]), &[2]);
    assert_eq!(reduction_geometry_of(&instr), Some(ReductionGeometry::row(1, 8192, 512)));
    assert_eq!(reduction_geometry_of(&custom_call("__cublas$gemm")), None);
}
