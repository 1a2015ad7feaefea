//! Instruction facts consumed by vesta's GPU emission analysis.
//!
//! This crate holds plain, immutable records copied out of the program
//! representation: shapes with physical layouts, ops with their attributes,
//! instructions with operand shapes, and fusion regions. Analyses never
//! mutate them.
//!
//! # Module Organization
//!
//! - [`layout`] - Physical major-to-minor dimension order
//! - [`shape`] - Shapes and dimension sets
//! - [`op`] - Operation enum and attributes
//! - [`instruction`] - Instruction records and value ids
//! - [`fusion`] - Fusion regions
//! - [`error`] - Error types

pub mod error;
pub mod fusion;
pub mod instruction;
pub mod layout;
pub mod op;
pub mod shape;


pub use error::{Error, Result};
pub use fusion::Fusion;
pub use instruction::{Instruction, Operand, ValueId};
pub use layout::Layout;
pub use op::{DotDimensionNumbers, ElementwiseOp, Op, SliceBounds};
pub use shape::{DimensionSet, Dimensions, Shape};

pub use vesta_dtype::PrimitiveType;
