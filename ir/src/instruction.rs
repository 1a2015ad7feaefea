//! Immutable instruction records.
//!
//! An [`Instruction`] is a snapshot of the facts about one computation node:
//! its op, its own shape, and the value and shape of every operand. Analyses
//! run on these records rather than on live graph nodes.

use std::fmt;

use bon::bon;
use smallvec::SmallVec;

use crate::{DimensionSet, Op, Shape};

/// Identity of a value in the surrounding program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Operand reference together with the operand's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operand {
    pub value: ValueId,
    pub shape: Shape,
}

impl Operand {
    pub fn new(value: ValueId, shape: Shape) -> Self {
        Self { value, shape }
    }
}

/// Snapshot of one computation node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    id: ValueId,
    op: Op,
    shape: Shape,
    operands: SmallVec<[Operand; 4]>,
}

#[bon]
impl Instruction {
    #[builder]
    pub fn new(id: ValueId, op: Op, shape: Shape, #[builder(default)] operands: Vec<Operand>) -> Self {
        Self { id, op, shape, operands: operands.into() }
    }
}

impl Instruction {
    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn parameter(id: ValueId, number: usize, shape: Shape) -> Self {
        Self { id, op: Op::Parameter { number }, shape, operands: SmallVec::new() }
    }

    /// Reduce `input` over `dimensions` starting from `init`.
    ///
    /// The result shape keeps the input's element type and the relative
    /// layout of the kept dimensions.
    pub fn reduce(id: ValueId, input: Operand, init: Operand, dimensions: DimensionSet) -> Self {
        let shape = input.shape.without_dimensions(&dimensions);
        Self { id, op: Op::Reduce { dimensions }, shape, operands: smallvec::smallvec![input, init] }
    }

    pub fn custom_call(id: ValueId, target: impl Into<String>, shape: Shape, operands: Vec<Operand>) -> Self {
        Self { id, op: Op::CustomCall { target: target.into() }, shape, operands: operands.into() }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> ValueId {
        self.id
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }

    pub fn operand_shape(&self, index: usize) -> Option<&Shape> {
        self.operands.get(index).map(|operand| &operand.shape)
    }

    /// Call target of a `CustomCall`, `None` for every other op.
    pub fn custom_call_target(&self) -> Option<&str> {
        match &self.op {
            Op::CustomCall { target } => Some(target),
            _ => None,
        }
    }

    /// Reduced dimensions of a `Reduce`, `None` for every other op.
    pub fn reduced_dimensions(&self) -> Option<&DimensionSet> {
        match &self.op {
            Op::Reduce { dimensions } => Some(dimensions),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} {}(", self.id, self.shape, self.op)?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", operand.value)?;
        }
        write!(f, ")")
    }
}
