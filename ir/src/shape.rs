//! Array shapes with physical layouts, and dimension sets over them.
//!
//! Shapes are immutable facts copied out of the program representation.
//! Every shape is fully static: dynamic dimensions never reach GPU emission
//! analysis.

use std::fmt;

use itertools::Itertools;
use smallvec::SmallVec;
use snafu::ensure;
use vesta_dtype::PrimitiveType;

use crate::{Layout, Result, error::*};

/// Dimension sizes in logical order.
///
/// Inline capacity of 4 covers the common ranks without heap allocation.
pub type Dimensions = SmallVec<[usize; 4]>;

/// Element type, logical dimension sizes and physical layout of an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    element_type: PrimitiveType,
    dimensions: Dimensions,
    layout: Layout,
}

impl Shape {
    /// Create a shape with an explicit layout.
    ///
    /// # Errors
    /// Returns an error if the layout rank differs from the number of dimensions.
    pub fn new(
        element_type: PrimitiveType,
        dimensions: impl IntoIterator<Item = usize>,
        layout: Layout,
    ) -> Result<Self> {
        let dimensions: Dimensions = dimensions.into_iter().collect();
        ensure!(
            dimensions.len() == layout.rank(),
            LayoutRankMismatchSnafu { shape_rank: dimensions.len(), layout_rank: layout.rank() }
        );
        Ok(Self { element_type, dimensions, layout })
    }

    /// Create a shape with a row-major layout.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use vesta_ir::Shape;
    /// # use vesta_dtype::PrimitiveType;
    /// let shape = Shape::row_major(PrimitiveType::F32, [8, 1024, 512]);
    /// assert_eq!(shape.element_count(), 8 * 1024 * 512);
    /// assert_eq!(shape.to_string(), "f32[8,1024,512]{0,1,2}");
    /// ```
    pub fn row_major(element_type: PrimitiveType, dimensions: impl IntoIterator<Item = usize>) -> Self {
        let dimensions: Dimensions = dimensions.into_iter().collect();
        let layout = Layout::row_major(dimensions.len());
        Self { element_type, dimensions, layout }
    }

    /// Rank-0 shape.
    pub fn scalar(element_type: PrimitiveType) -> Self {
        Self::row_major(element_type, [])
    }

    pub fn element_type(&self) -> PrimitiveType {
        self.element_type
    }

    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    pub fn dimension(&self, dim: usize) -> usize {
        self.dimensions[dim]
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    pub fn element_count(&self) -> usize {
        self.dimensions.iter().product()
    }

    pub fn is_zero_element(&self) -> bool {
        self.dimensions.contains(&0)
    }

    pub fn byte_size(&self) -> usize {
        self.element_count() * self.element_type.bytes()
    }

    /// Logical dimensions with their sizes, in physical major-to-minor order.
    pub fn physical_dimensions(&self) -> impl DoubleEndedIterator<Item = (usize, usize)> + '_ {
        self.layout.major_to_minor().iter().map(|&dim| (dim, self.dimensions[dim]))
    }

    /// Same dimensions, ignoring element type and layout.
    pub fn compatible_ignoring_element_type(&self, other: &Shape) -> bool {
        self.dimensions == other.dimensions
    }

    /// Same dimensions and layout, ignoring element type.
    pub fn equal_ignoring_element_type(&self, other: &Shape) -> bool {
        self.dimensions == other.dimensions && self.layout == other.layout
    }

    /// Copy of this shape with another layout.
    pub fn with_layout(&self, layout: Layout) -> Result<Self> {
        Self::new(self.element_type, self.dimensions.iter().copied(), layout)
    }

    /// Copy of this shape with another element type.
    pub fn with_element_type(&self, element_type: PrimitiveType) -> Self {
        Self { element_type, ..self.clone() }
    }

    /// Shape produced by reducing `reduced` dimensions away.
    pub fn without_dimensions(&self, reduced: &DimensionSet) -> Self {
        let dimensions = self
            .dimensions
            .iter()
            .enumerate()
            .filter(|(dim, _)| !reduced.contains(*dim))
            .map(|(_, &size)| size)
            .collect();
        let layout = self.layout.without_dimensions(reduced.as_slice());
        Self { element_type: self.element_type, dimensions, layout }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{}", self.element_type, self.dimensions.iter().join(","), self.layout)
    }
}

// =========================================================================
// Dimension sets
// =========================================================================

/// Sorted, duplicate-free set of logical dimension indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DimensionSet {
    dims: SmallVec<[usize; 4]>,
}

impl DimensionSet {
    /// Create a non-empty dimension set for an array of the given rank.
    ///
    /// # Errors
    /// Returns an error if the set is empty, has an index `>= rank`, or lists
    /// an index twice.
    pub fn new(dims: impl IntoIterator<Item = usize>, rank: usize) -> Result<Self> {
        let mut sorted: SmallVec<[usize; 4]> = dims.into_iter().collect();
        ensure!(!sorted.is_empty(), EmptyDimensionSetSnafu);
        sorted.sort_unstable();

        if let Some(&dim) = sorted.last() {
            ensure!(dim < rank, DimensionOutOfRangeSnafu { dim, rank });
        }
        if let Some((&dim, _)) = sorted.iter().tuple_windows().find(|(a, b)| a == b) {
            return DuplicateDimensionSnafu { dim }.fail();
        }

        Ok(Self { dims: sorted })
    }

    /// Every dimension of `rank` not contained in `self`. May be empty.
    pub fn complement(&self, rank: usize) -> Self {
        Self { dims: (0..rank).filter(|dim| !self.contains(*dim)).collect() }
    }

    pub fn contains(&self, dim: usize) -> bool {
        self.dims.binary_search(&dim).is_ok()
    }

    pub fn len(&self) -> usize {
        self.dims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.dims
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.dims.iter().copied()
    }

    /// Largest index in the set, if any.
    pub fn max(&self) -> Option<usize> {
        self.dims.last().copied()
    }
}

impl fmt::Display for DimensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.dims.as_slice())
    }
}
