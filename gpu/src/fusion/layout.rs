//! Layout inference inside fusion regions.
//!
//! Values inside a fusion carry no physical layout of their own. Layouts are
//! known only at the boundary: parameters inherit the layout of the buffer
//! bound to them, and roots the layout of the buffer they are stored to.
//! Elementwise ops preserve layout, so boundary layouts are pushed forward
//! from operands to results and backward from results to operands until
//! nothing changes.

use std::collections::HashMap;

use vesta_ir::{Fusion, Instruction, Layout, Operand, Shape, ValueId};

/// Inferred layout of each value in a fusion.
///
/// The default (empty) analysis describes values outside any fusion: every
/// shape keeps its declared layout.
#[derive(Debug, Clone, Default)]
pub struct FusionLayoutAnalysis {
    layouts: HashMap<ValueId, Layout>,
}

impl FusionLayoutAnalysis {
    pub fn new(fusion: &Fusion) -> Self {
        let mut layouts = HashMap::new();

        for (param, argument) in fusion.parameters().iter().zip(fusion.arguments()) {
            if argument.shape.rank() == param.shape().rank() {
                layouts.insert(param.id(), argument.shape.layout().clone());
            }
        }
        for (root, buffer) in fusion.root_values().iter().zip(fusion.output_buffers()) {
            let rank_matches = fusion.get(*root).is_some_and(|inst| inst.shape().rank() == buffer.shape.rank());
            if rank_matches {
                layouts.insert(*root, buffer.shape.layout().clone());
            }
        }

        let mut rounds = 0;
        let mut changed = true;
        while changed {
            changed = false;
            rounds += 1;
            for inst in fusion.body().iter().filter(|inst| inst.op().is_elementwise()) {
                let rank = inst.shape().rank();

                if !layouts.contains_key(&inst.id()) {
                    let from_operand = inst
                        .operands()
                        .iter()
                        .filter(|operand| operand.shape.rank() == rank)
                        .find_map(|operand| layouts.get(&operand.value).cloned());
                    if let Some(layout) = from_operand {
                        layouts.insert(inst.id(), layout);
                        changed = true;
                    }
                }

                let Some(layout) = layouts.get(&inst.id()).cloned() else {
                    continue;
                };
                for operand in inst.operands().iter().filter(|operand| operand.shape.rank() == rank) {
                    if !layouts.contains_key(&operand.value) {
                        layouts.insert(operand.value, layout.clone());
                        changed = true;
                    }
                }
            }
        }

        tracing::trace!(fusion = fusion.name(), inferred = layouts.len(), rounds, "fusion layouts");
        Self { layouts }
    }

    pub fn layout_of(&self, value: ValueId) -> Option<&Layout> {
        self.layouts.get(&value)
    }

    /// `declared` with the inferred layout of `value`, if one is known.
    pub fn shape_of(&self, value: ValueId, declared: &Shape) -> Shape {
        self.layout_of(value)
            .and_then(|layout| declared.with_layout(layout.clone()).ok())
            .unwrap_or_else(|| declared.clone())
    }

    /// Copy of `instr` whose own shape and operand shapes carry inferred layouts.
    pub fn resolve(&self, instr: &Instruction) -> Instruction {
        let operands = instr
            .operands()
            .iter()
            .map(|operand| Operand::new(operand.value, self.shape_of(operand.value, &operand.shape)))
            .collect();
        Instruction::builder()
            .id(instr.id())
            .op(instr.op().clone())
            .shape(self.shape_of(instr.id(), instr.shape()))
            .operands(operands)
            .build()
    }
}
