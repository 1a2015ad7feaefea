//! Builders for the shapes, instructions and fusions used across tests.

use vesta_ir::{
    DimensionSet, ElementwiseOp, Fusion, Instruction, Layout, Op, Operand, PrimitiveType, Shape, SliceBounds, ValueId,
};

/// Shape with an explicit major-to-minor layout.
pub fn shape(element_type: PrimitiveType, dims: &[usize], major_to_minor: &[usize]) -> Shape {
    let layout = Layout::new(major_to_minor.iter().copied()).expect("valid layout");
    Shape::new(element_type, dims.iter().copied(), layout).expect("layout rank matches")
}

pub fn f32_shape(dims: &[usize]) -> Shape {
    Shape::row_major(PrimitiveType::F32, dims.iter().copied())
}

pub fn dims(reduced: &[usize], rank: usize) -> DimensionSet {
    DimensionSet::new(reduced.iter().copied(), rank).expect("valid dimension set")
}

/// `id = reduce(%input, %init)` over `reduced`.
pub fn reduce_of(id: u32, input: u32, init: u32, input_shape: Shape, reduced: &[usize]) -> Instruction {
    let rank = input_shape.rank();
    let init_shape = Shape::scalar(input_shape.element_type());
    Instruction::reduce(
        ValueId(id),
        Operand::new(ValueId(input), input_shape),
        Operand::new(ValueId(init), init_shape),
        dims(reduced, rank),
    )
}

/// Standalone reduce reading `%0` with init `%1`.
pub fn reduce(input_shape: Shape, reduced: &[usize]) -> Instruction {
    reduce_of(2, 0, 1, input_shape, reduced)
}

pub fn unary(id: u32, op: ElementwiseOp, input: Operand) -> Instruction {
    Instruction::builder()
        .id(ValueId(id))
        .op(Op::Elementwise(op))
        .shape(input.shape.clone())
        .operands(vec![input])
        .build()
}

pub fn constant(id: u32, shape: Shape) -> Instruction {
    Instruction::builder().id(ValueId(id)).op(Op::Constant).shape(shape).build()
}

pub fn dot(lhs: Shape, rhs: Shape, output: Shape, batch: usize) -> Instruction {
    let numbers = if batch == 0 {
        vesta_ir::DotDimensionNumbers::matmul()
    } else {
        vesta_ir::DotDimensionNumbers::batched_matmul(batch)
    };
    Instruction::builder()
        .id(ValueId(2))
        .op(Op::Dot(numbers))
        .shape(output)
        .operands(vec![Operand::new(ValueId(0), lhs), Operand::new(ValueId(1), rhs)])
        .build()
}

pub fn custom_call(target: &str) -> Instruction {
    Instruction::custom_call(ValueId(2), target, f32_shape(&[16]), vec![Operand::new(ValueId(0), f32_shape(&[16]))])
}

pub fn slice(id: u32, input: Operand, start: usize, limit: usize, stride: usize) -> Instruction {
    let bounds = SliceBounds {
        starts: smallvec::smallvec![start],
        limits: smallvec::smallvec![limit],
        strides: smallvec::smallvec![stride],
    };
    let len = (limit - start).div_ceil(stride);
    Instruction::builder()
        .id(ValueId(id))
        .op(Op::Slice(bounds))
        .shape(Shape::row_major(input.shape.element_type(), [len]))
        .operands(vec![input])
        .build()
}

/// Fusion `dus` updating a `[16]` f32 buffer in place.
///
/// Parameters `%10` (buffer, bound to `%1`), `%11` (update, `%2`) and `%12`
/// (index, `%3`); root `%13` stored to `%4`.
pub fn dynamic_update_slice_fusion() -> Fusion {
    let buffer = f32_shape(&[16]);
    let update = f32_shape(&[4]);
    let index = Shape::scalar(PrimitiveType::S32);
    let dus = Instruction::builder()
        .id(ValueId(13))
        .op(Op::DynamicUpdateSlice)
        .shape(buffer.clone())
        .operands(vec![
            Operand::new(ValueId(10), buffer.clone()),
            Operand::new(ValueId(11), update.clone()),
            Operand::new(ValueId(12), index.clone()),
        ])
        .build();

    Fusion::builder()
        .name("dus")
        .parameters(vec![
            Instruction::parameter(ValueId(10), 0, buffer.clone()),
            Instruction::parameter(ValueId(11), 1, update.clone()),
            Instruction::parameter(ValueId(12), 2, index.clone()),
        ])
        .arguments(vec![
            Operand::new(ValueId(1), buffer.clone()),
            Operand::new(ValueId(2), update),
            Operand::new(ValueId(3), index),
        ])
        .body(vec![dus])
        .roots(vec![ValueId(13)])
        .output_buffers(vec![Operand::new(ValueId(4), buffer)])
        .build()
        .expect("valid fusion")
}
