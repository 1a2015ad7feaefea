//! Physical dimension order of an array.

use std::fmt;

use itertools::Itertools;
use smallvec::SmallVec;
use snafu::ensure;

use crate::{Result, error::*};

/// Permutation listing logical dimensions in physical major-to-minor order.
///
/// `major_to_minor[0]` is the slowest-varying dimension in memory and the last
/// entry is the contiguous one. A rank-3 row-major array has layout `[0, 1, 2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    major_to_minor: SmallVec<[usize; 4]>,
}

impl Layout {
    /// Create a layout from a major-to-minor permutation.
    ///
    /// # Errors
    /// Returns [`Error::InvalidLayout`](crate::Error::InvalidLayout) if the
    /// input is not a permutation of `0..len`.
    pub fn new(major_to_minor: impl IntoIterator<Item = usize>) -> Result<Self> {
        let major_to_minor: SmallVec<[usize; 4]> = major_to_minor.into_iter().collect();
        let rank = major_to_minor.len();

        let mut seen: SmallVec<[bool; 4]> = smallvec::smallvec![false; rank];
        for &dim in &major_to_minor {
            ensure!(dim < rank && !seen[dim], InvalidLayoutSnafu { major_to_minor: major_to_minor.clone(), rank });
            seen[dim] = true;
        }

        Ok(Self { major_to_minor })
    }

    /// Create a layout from a minor-to-major permutation.
    pub fn from_minor_to_major(minor_to_major: impl IntoIterator<Item = usize>) -> Result<Self> {
        let mut dims: SmallVec<[usize; 4]> = minor_to_major.into_iter().collect();
        dims.reverse();
        Self::new(dims)
    }

    /// Row-major layout: logical order equals physical order.
    pub fn row_major(rank: usize) -> Self {
        Self { major_to_minor: (0..rank).collect() }
    }

    pub fn rank(&self) -> usize {
        self.major_to_minor.len()
    }

    pub fn major_to_minor(&self) -> &[usize] {
        &self.major_to_minor
    }

    pub fn minor_to_major(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.major_to_minor.iter().rev().copied()
    }

    /// Position of logical `dim` in major-to-minor order.
    pub fn physical_position(&self, dim: usize) -> Option<usize> {
        self.major_to_minor.iter().position(|&d| d == dim)
    }

    /// Logical dimension stored fastest in memory.
    pub fn minor_most(&self) -> Option<usize> {
        self.major_to_minor.last().copied()
    }

    pub fn is_row_major(&self) -> bool {
        self.major_to_minor.iter().enumerate().all(|(pos, &dim)| pos == dim)
    }

    /// Layout of the array left after deleting `removed` logical dimensions.
    ///
    /// Remaining dimensions keep their relative physical order and are
    /// renumbered densely.
    pub fn without_dimensions(&self, removed: &[usize]) -> Self {
        let major_to_minor = self
            .major_to_minor
            .iter()
            .filter(|dim| !removed.contains(dim))
            .map(|&dim| dim - removed.iter().filter(|&&r| r < dim).count())
            .collect();
        Self { major_to_minor }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.major_to_minor.iter().join(","))
    }
}
