//! Target device capabilities and reduction tuning limits.
//!
//! The analysis never reads global constants: warp width, compute capability
//! and the reduction thresholds are threaded through every call in a
//! [`DeviceCapability`] value so alternative hardware profiles can be
//! exercised deterministically.

use std::fmt;
use std::str::FromStr;

use bon::bon;

// ============================================================================
// COMPUTE CAPABILITY
// ============================================================================

/// CUDA-style compute capability (`major.minor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ComputeCapability {
    pub major: u32,
    pub minor: u32,
}

impl ComputeCapability {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub const fn is_at_least(&self, major: u32, minor: u32) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }
}

impl fmt::Display for ComputeCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ComputeCapability {
    type Err = std::num::ParseIntError;

    /// Parses `"8.0"`, or `"8"` as `8.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.trim().split_once('.').unwrap_or((s.trim(), "0"));
        Ok(Self { major: major.parse()?, minor: minor.parse()? })
    }
}

// ============================================================================
// REDUCTION LIMITS
// ============================================================================

/// Tunable thresholds for reduction tiling.
///
/// None of these are derived from first principles; they are the values the
/// row/column reduction emitters were tuned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionLimits {
    /// Threads per block along x for row reductions (tree reductions need at
    /// least this many threads to perform well).
    pub min_threads_x_row_reduction: usize,
    /// Largest depth of a batched row reduction that can stay race free.
    pub batched_race_free_bound: usize,
    /// Per-thread tile along the reduced band of column reductions.
    pub column_tile_height: usize,
    /// Default per-thread tile along the width of row reductions.
    pub row_unroll: usize,
    /// Row tile when the width is a multiple of `warp² · wide_row_unroll`.
    pub wide_row_unroll: usize,
}

impl Default for ReductionLimits {
    fn default() -> Self {
        Self {
            min_threads_x_row_reduction: 1024,
            batched_race_free_bound: 8,
            column_tile_height: 128,
            row_unroll: 8,
            wide_row_unroll: 64,
        }
    }
}

#[bon]
impl ReductionLimits {
    /// Create reduction limits with builder pattern.
    #[builder]
    pub fn new(
        #[builder(default = 1024)] min_threads_x_row_reduction: usize,
        #[builder(default = 8)] batched_race_free_bound: usize,
        #[builder(default = 128)] column_tile_height: usize,
        #[builder(default = 8)] row_unroll: usize,
        #[builder(default = 64)] wide_row_unroll: usize,
    ) -> Self {
        Self { min_threads_x_row_reduction, batched_race_free_bound, column_tile_height, row_unroll, wide_row_unroll }
    }

    /// Create limits from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `VESTA_MIN_THREADS_X_ROW_REDUCTION` - Row reduction block width (default: 1024)
    /// * `VESTA_BATCHED_RACE_FREE_BOUND` - Max race-free batch depth (default: 8)
    /// * `VESTA_COLUMN_TILE_HEIGHT` - Column reduction tile (default: 128)
    /// * `VESTA_ROW_UNROLL` - Row reduction tile (default: 8)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_threads_x_row_reduction: env_or(
                "VESTA_MIN_THREADS_X_ROW_REDUCTION",
                defaults.min_threads_x_row_reduction,
            ),
            batched_race_free_bound: env_or("VESTA_BATCHED_RACE_FREE_BOUND", defaults.batched_race_free_bound),
            column_tile_height: env_or("VESTA_COLUMN_TILE_HEIGHT", defaults.column_tile_height),
            row_unroll: env_or("VESTA_ROW_UNROLL", defaults.row_unroll),
            ..defaults
        }
    }
}

// ============================================================================
// DEVICE CAPABILITY
// ============================================================================

/// Capabilities of the target device relevant to kernel planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCapability {
    /// Device identifier (e.g., "CUDA_SM80").
    pub device: String,

    /// Threads per warp (wavefront on AMD).
    pub warp_size: usize,

    pub compute_capability: ComputeCapability,

    /// Maximum threads in one block.
    pub max_threads_per_block: usize,

    pub limits: ReductionLimits,
}

impl Default for DeviceCapability {
    fn default() -> Self {
        Self::cuda_sm80()
    }
}

impl DeviceCapability {
    /// Pascal (P100, GTX 10xx).
    pub fn cuda_sm60() -> Self {
        Self::cuda("CUDA_SM60", ComputeCapability::new(6, 0))
    }

    /// Volta (V100).
    pub fn cuda_sm70() -> Self {
        Self::cuda("CUDA_SM70", ComputeCapability::new(7, 0))
    }

    /// Ampere (A100, RTX 30xx).
    pub fn cuda_sm80() -> Self {
        Self::cuda("CUDA_SM80", ComputeCapability::new(8, 0))
    }

    /// CDNA2 (MI200). Wavefronts are 64 wide.
    pub fn rocm_gfx90a() -> Self {
        Self {
            device: "ROCM_GFX90A".to_string(),
            warp_size: 64,
            compute_capability: ComputeCapability::new(9, 0),
            max_threads_per_block: 1024,
            limits: ReductionLimits::default(),
        }
    }

    fn cuda(device: &str, compute_capability: ComputeCapability) -> Self {
        Self {
            device: device.to_string(),
            warp_size: 32,
            compute_capability,
            max_threads_per_block: 1024,
            limits: ReductionLimits::default(),
        }
    }
}

#[bon]
impl DeviceCapability {
    /// Create a device description with builder pattern.
    #[builder]
    pub fn new(
        #[builder(into, default = "CUDA".to_string())] device: String,
        #[builder(default = 32)] warp_size: usize,
        #[builder(default = ComputeCapability::new(8, 0))] compute_capability: ComputeCapability,
        #[builder(default = 1024)] max_threads_per_block: usize,
        #[builder(default)] limits: ReductionLimits,
    ) -> Self {
        Self { device, warp_size, compute_capability, max_threads_per_block, limits }
    }

    /// Create a device description from environment variables.
    ///
    /// Starts from [`DeviceCapability::cuda_sm80`].
    ///
    /// # Environment Variables
    ///
    /// * `VESTA_WARP_SIZE` - Threads per warp (default: 32)
    /// * `VESTA_COMPUTE_CAPABILITY` - `major.minor` (default: 8.0)
    /// * `VESTA_MAX_THREADS_PER_BLOCK` - Block size limit (default: 1024)
    /// * plus everything read by [`ReductionLimits::from_env`]
    pub fn from_env() -> Self {
        let defaults = Self::cuda_sm80();
        Self {
            warp_size: env_or("VESTA_WARP_SIZE", defaults.warp_size),
            compute_capability: env_or("VESTA_COMPUTE_CAPABILITY", defaults.compute_capability),
            max_threads_per_block: env_or("VESTA_MAX_THREADS_PER_BLOCK", defaults.max_threads_per_block),
            limits: ReductionLimits::from_env(),
            ..defaults
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

// ============================================================================
// TESTS
// ============================================================================
