//! Fusion regions.
//!
//! A [`Fusion`] is a region of instructions emitted as one kernel. It records
//! the outer values bound to its parameters and the outer buffers that
//! receive its results, so analyses can reason about memory without access to
//! the enclosing program.

use std::collections::HashMap;

use bon::bon;
use smallvec::SmallVec;
use snafu::{OptionExt, ensure};

use crate::{Instruction, Op, Operand, Result, ValueId, error::*};

#[derive(Debug, Clone)]
pub struct Fusion {
    name: String,
    parameters: Vec<Instruction>,
    arguments: Vec<Operand>,
    body: Vec<Instruction>,
    roots: SmallVec<[ValueId; 2]>,
    output_buffers: SmallVec<[Operand; 2]>,
    index: HashMap<ValueId, Slot>,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Parameter(usize),
    Body(usize),
}

#[bon]
impl Fusion {
    /// Build and validate a fusion region.
    ///
    /// * `parameters` - `Parameter { number: i }` instructions, in number order
    /// * `arguments` - outer value bound to each parameter
    /// * `body` - remaining instructions in topological order
    /// * `roots` - values produced by the fusion
    /// * `output_buffers` - outer buffer receiving each root
    ///
    /// # Errors
    /// Returns an error if a value is defined twice, used before definition,
    /// or if parameter/argument and root/output lists do not pair up.
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        #[builder(default)] parameters: Vec<Instruction>,
        #[builder(default)] arguments: Vec<Operand>,
        body: Vec<Instruction>,
        roots: Vec<ValueId>,
        #[builder(default)] output_buffers: Vec<Operand>,
    ) -> Result<Self> {
        ensure!(!roots.is_empty(), NoRootsSnafu { fusion: name.clone() });
        ensure!(
            parameters.len() == arguments.len(),
            ArityMismatchSnafu {
                what: "arguments",
                expected: parameters.len(),
                actual: arguments.len(),
                fusion: name.clone()
            }
        );
        ensure!(
            output_buffers.is_empty() || output_buffers.len() == roots.len(),
            ArityMismatchSnafu {
                what: "output buffers",
                expected: roots.len(),
                actual: output_buffers.len(),
                fusion: name.clone()
            }
        );

        let mut index = HashMap::with_capacity(parameters.len() + body.len());
        for (i, param) in parameters.iter().enumerate() {
            ensure!(
                matches!(param.op(), Op::Parameter { number } if *number == i),
                MisnumberedParameterSnafu { value: param.id(), expected: i, fusion: name.clone() }
            );
            ensure!(
                index.insert(param.id(), Slot::Parameter(i)).is_none(),
                DuplicateValueSnafu { value: param.id(), fusion: name.clone() }
            );
        }
        for (i, inst) in body.iter().enumerate() {
            for operand in inst.operands() {
                ensure!(
                    index.contains_key(&operand.value),
                    UnknownValueSnafu { value: operand.value, fusion: name.clone() }
                );
            }
            ensure!(
                index.insert(inst.id(), Slot::Body(i)).is_none(),
                DuplicateValueSnafu { value: inst.id(), fusion: name.clone() }
            );
        }
        for root in &roots {
            ensure!(index.contains_key(root), UnknownValueSnafu { value: *root, fusion: name.clone() });
        }

        Ok(Self {
            name,
            parameters,
            arguments,
            body,
            roots: roots.into(),
            output_buffers: output_buffers.into(),
            index,
        })
    }
}

impl Fusion {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Instruction] {
        &self.parameters
    }

    /// Outer operand bound to parameter `number`.
    pub fn argument(&self, number: usize) -> Option<&Operand> {
        self.arguments.get(number)
    }

    pub fn arguments(&self) -> &[Operand] {
        &self.arguments
    }

    /// Non-parameter instructions in topological order.
    pub fn body(&self) -> &[Instruction] {
        &self.body
    }

    /// Parameters followed by the body, in topological order.
    pub fn instructions(&self) -> impl DoubleEndedIterator<Item = &Instruction> {
        self.parameters.iter().chain(self.body.iter())
    }

    pub fn root_values(&self) -> &[ValueId] {
        &self.roots
    }

    pub fn roots(&self) -> impl Iterator<Item = &Instruction> {
        self.roots.iter().filter_map(|id| self.get(*id))
    }

    pub fn output_buffers(&self) -> &[Operand] {
        &self.output_buffers
    }

    pub fn get(&self, id: ValueId) -> Option<&Instruction> {
        match *self.index.get(&id)? {
            Slot::Parameter(i) => self.parameters.get(i),
            Slot::Body(i) => self.body.get(i),
        }
    }

    /// Like [`Fusion::get`] but reports a missing value as an error.
    pub fn require(&self, id: ValueId) -> Result<&Instruction> {
        self.get(id).context(UnknownValueSnafu { value: id, fusion: self.name.clone() })
    }

    /// Parameter number of `id`, if it is a fusion parameter.
    pub fn parameter_number(&self, id: ValueId) -> Option<usize> {
        match self.get(id)?.op() {
            Op::Parameter { number } => Some(*number),
            _ => None,
        }
    }
}
