use test_case::test_case;
use vesta_dtype::PrimitiveType;

use crate::{DimensionSet, Error, Layout, Shape};

#[test]
fn test_shape_rank_mismatch() {
    let err = Shape::new(PrimitiveType::F32, [2, 3], Layout::row_major(3)).unwrap_err();
    assert_eq!(err, Error::LayoutRankMismatch { shape_rank: 2, layout_rank: 3 });
}

#[test]
fn test_shape_sizes() {
    let shape = Shape::row_major(PrimitiveType::F16, [4, 0, 3]);
    assert_eq!(shape.element_count(), 0);
    assert!(shape.is_zero_element());

    let shape = Shape::row_major(PrimitiveType::F16, [4, 5, 3]);
    assert_eq!(shape.element_count(), 60);
    assert_eq!(shape.byte_size(), 120);
    assert_eq!(Shape::scalar(PrimitiveType::S32).element_count(), 1);
}

#[test]
fn test_physical_dimensions_follow_layout() {
    let shape = Shape::new(PrimitiveType::F32, [8, 16, 32], Layout::new([2, 0, 1]).unwrap()).unwrap();
    let physical: Vec<_> = shape.physical_dimensions().collect();
    assert_eq!(physical, vec![(2, 32), (0, 8), (1, 16)]);
}

#[test]
fn test_without_dimensions() {
    let shape = Shape::new(PrimitiveType::F32, [8, 16, 32], Layout::new([2, 0, 1]).unwrap()).unwrap();
    let reduced = shape.without_dimensions(&DimensionSet::new([0], 3).unwrap());
    assert_eq!(reduced.dimensions(), &[16, 32]);
    assert_eq!(reduced.layout().major_to_minor(), &[1, 0]);
}

#[test]
fn test_compatibility() {
    let a = Shape::row_major(PrimitiveType::F32, [4, 8]);
    let b = Shape::new(PrimitiveType::F16, [4, 8], Layout::new([1, 0]).unwrap()).unwrap();
    assert!(a.compatible_ignoring_element_type(&b));
    assert!(!a.equal_ignoring_element_type(&b));
    assert!(a.equal_ignoring_element_type(&a.with_element_type(PrimitiveType::S8)));
}

#[test]
fn test_display() {
    let shape = Shape::new(PrimitiveType::BF16, [2, 3], Layout::new([1, 0]).unwrap()).unwrap();
    assert_eq!(shape.to_string(), "bf16[2,3]{1,0}");
}

#[test_case(vec![], 3 => matches Err(Error::EmptyDimensionSet); "empty")]
#[test_case(vec![3], 3 => matches Err(Error::DimensionOutOfRange { dim: 3, rank: 3 }); "out_of_range")]
#[test_case(vec![1, 1], 3 => matches Err(Error::DuplicateDimension { dim: 1 }); "duplicate")]
#[test_case(vec![2, 0], 3 => matches Ok(_); "unsorted_ok")]
fn test_dimension_set_validation(dims: Vec<usize>, rank: usize) -> Result<DimensionSet, Error> {
    DimensionSet::new(dims, rank)
}

#[test]
fn test_dimension_set_complement() {
    let set = DimensionSet::new([2, 0], 4).unwrap();
    assert_eq!(set.as_slice(), &[0, 2]);
    assert_eq!(set.complement(4).as_slice(), &[1, 3]);
    assert!(DimensionSet::new([0, 1], 2).unwrap().complement(2).is_empty());
    assert_eq!(set.max(), Some(2));
}
