use vesta_dtype::PrimitiveType;

use crate::{DimensionSet, ElementwiseOp, Error, Fusion, Instruction, Op, Operand, Shape, ValueId};

fn f32_shape(dims: &[usize]) -> Shape {
    Shape::row_major(PrimitiveType::F32, dims.iter().copied())
}

fn exp(id: u32, input: u32, dims: &[usize]) -> Instruction {
    Instruction::builder()
        .id(ValueId(id))
        .op(Op::Elementwise(ElementwiseOp::Exp))
        .shape(f32_shape(dims))
        .operands(vec![Operand::new(ValueId(input), f32_shape(dims))])
        .build()
}

#[test]
fn test_fusion_lookup() {
    let param = Instruction::parameter(ValueId(10), 0, f32_shape(&[4, 8]));
    let body = vec![exp(11, 10, &[4, 8])];
    let fusion = Fusion::builder()
        .name("fusion.1")
        .parameters(vec![param])
        .arguments(vec![Operand::new(ValueId(1), f32_shape(&[4, 8]))])
        .body(body)
        .roots(vec![ValueId(11)])
        .output_buffers(vec![Operand::new(ValueId(2), f32_shape(&[4, 8]))])
        .build()
        .unwrap();

    assert_eq!(fusion.name(), "fusion.1");
    assert_eq!(fusion.parameter_number(ValueId(10)), Some(0));
    assert_eq!(fusion.parameter_number(ValueId(11)), None);
    assert_eq!(fusion.argument(0).map(|arg| arg.value), Some(ValueId(1)));
    assert_eq!(fusion.roots().count(), 1);
    assert_eq!(fusion.instructions().count(), 2);
    assert!(fusion.get(ValueId(99)).is_none());
    assert!(matches!(fusion.require(ValueId(99)), Err(Error::UnknownValue { .. })));
}

#[test]
fn test_fusion_rejects_use_before_definition() {
    let err = Fusion::builder().name("f").body(vec![exp(11, 10, &[4])]).roots(vec![ValueId(11)]).build().unwrap_err();
    assert!(matches!(err, Error::UnknownValue { value: ValueId(10), .. }));
}

#[test]
fn test_fusion_rejects_duplicate_definition() {
    let param = Instruction::parameter(ValueId(10), 0, f32_shape(&[4]));
    let err = Fusion::builder()
        .name("f")
        .parameters(vec![param])
        .arguments(vec![Operand::new(ValueId(1), f32_shape(&[4]))])
        .body(vec![exp(11, 10, &[4]), exp(11, 10, &[4])])
        .roots(vec![ValueId(11)])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateValue { value: ValueId(11), .. }));
}

#[test]
fn test_fusion_rejects_unbound_parameter() {
    let param = Instruction::parameter(ValueId(10), 0, f32_shape(&[4]));
    let err = Fusion::builder()
        .name("f")
        .parameters(vec![param])
        .body(vec![exp(11, 10, &[4])])
        .roots(vec![ValueId(11)])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::ArityMismatch { what: "arguments", expected: 1, actual: 0, .. }));
}

#[test]
fn test_fusion_rejects_misnumbered_parameter() {
    let param = Instruction::parameter(ValueId(10), 1, f32_shape(&[4]));
    let err = Fusion::builder()
        .name("f")
        .parameters(vec![param])
        .arguments(vec![Operand::new(ValueId(1), f32_shape(&[4]))])
        .body(vec![exp(11, 10, &[4])])
        .roots(vec![ValueId(11)])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::MisnumberedParameter { expected: 0, .. }));
}

#[test]
fn test_fusion_requires_roots() {
    let err = Fusion::builder().name("f").body(vec![]).roots(vec![]).build().unwrap_err();
    assert!(matches!(err, Error::NoRoots { .. }));
}

#[test]
fn test_reduce_result_shape() {
    let input = Operand::new(ValueId(0), f32_shape(&[8, 1024, 512]));
    let init = Operand::new(ValueId(1), Shape::scalar(PrimitiveType::F32));
    let reduce = Instruction::reduce(ValueId(2), input, init, DimensionSet::new([2], 3).unwrap());

    assert_eq!(reduce.shape().dimensions(), &[8, 1024]);
    assert_eq!(reduce.reduced_dimensions().map(|d| d.as_slice()), Some(&[2usize][..]));
    assert_eq!(reduce.custom_call_target(), None);
    assert_eq!(reduce.to_string(), "%2 = f32[8,1024]{0,1} reduce(dimensions=[2])(%0, %1)");
}
