//! GPU emission analysis.
//!
//! Decides how instructions and fusions are lowered for a GPU target:
//! whether an instruction becomes a vendor library call, whether a reduction
//! can use the tiled reduction emitter (and with which tiling and launch
//! shape), and which specialised emitter a fusion qualifies for.
//!
//! All analyses are pure functions over immutable [`vesta_ir`] records and a
//! [`DeviceCapability`].
//!
//! # Module Organization
//!
//! - [`device`] - Device capabilities and reduction tuning limits
//! - [`reduction`] - Contiguity, geometry, tiling and race freedom of reductions
//! - [`library_call`] - cuBLAS/cuDNN/cuSolver call classification
//! - [`fusion`] - Fusion layout inference and fusion shape checks
//! - [`allocation`] - Buffer allocations and slice resolution
//! - [`plan`] - Emission strategy selection
//!
//! # Example
//!
//! ```
//! use vesta_gpu::{DeviceCapability, plan::plan_reduction};
//! use vesta_ir::{DimensionSet, PrimitiveType, Shape};
//!
//! let input = Shape::row_major(PrimitiveType::F32, [8, 1024, 512]);
//! let reduced = DimensionSet::new([2], 3).unwrap();
//! let plan = plan_reduction(&input, &reduced, &DeviceCapability::default(), None).unwrap();
//!
//! assert!(plan.geometry.is_row_reduction);
//! assert!(plan.race_free);
//! ```

pub mod allocation;
pub mod device;
pub mod error;
pub mod fusion;
pub mod library_call;
pub mod plan;
pub mod reduction;


pub use allocation::{AllocationKind, AllocationTable, BufferAllocation, BufferSlice, ResolvedSlice, resolve_slice};
pub use device::{ComputeCapability, DeviceCapability, ReductionLimits};
pub use error::{Error, Result};
pub use fusion::FusionLayoutAnalysis;
pub use library_call::{CallClassification, CudnnBatchNormKind, CudnnConvKind, classify_call};
pub use plan::{EmissionStrategy, FusionPlan, ReductionPlan, plan_fusion, plan_instruction};
pub use reduction::{ReductionGeometry, ThreadGrid, TilingFactors};
