//! Buffer allocations and resolution of values to allocation slices.
//!
//! Buffer assignment has already run when the analysis is asked about
//! memory. Its result is handed over as an [`AllocationTable`]: the
//! allocations themselves, plus for every value either a direct slice of an
//! allocation or a byte-offset view of another value.

use std::collections::HashMap;
use std::fmt;

use smallvec::SmallVec;
use snafu::{OptionExt, ensure};
use vesta_ir::ValueId;

use crate::{Result, error::*};

/// What an allocation holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AllocationKind {
    /// Entry parameter `number`.
    Parameter { number: usize },
    /// Constant baked into the module; `name` is its global symbol.
    Constant { name: String },
    /// Scratch space.
    Temp,
    /// Program output.
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferAllocation {
    pub index: usize,
    /// Size in bytes.
    pub size: usize,
    pub kind: AllocationKind,
}

impl BufferAllocation {
    pub fn constant_name(&self) -> Option<&str> {
        match &self.kind {
            AllocationKind::Constant { name } => Some(name),
            _ => None,
        }
    }
}

/// Byte range `[offset, offset + size)` of one allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferSlice {
    pub allocation: usize,
    pub offset: usize,
    pub size: usize,
}

impl BufferSlice {
    pub const fn new(allocation: usize, offset: usize, size: usize) -> Self {
        Self { allocation, offset, size }
    }

    pub fn overlaps(&self, other: &BufferSlice) -> bool {
        self.allocation == other.allocation
            && self.offset < other.offset + other.size
            && other.offset < self.offset + self.size
    }
}

impl fmt::Display for BufferSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alloc{}[{}:{}]", self.allocation, self.offset, self.offset + self.size)
    }
}

/// How a value is placed in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueBinding {
    /// Directly assigned to a slice.
    Slice(BufferSlice),
    /// `size` bytes starting `offset` bytes into the memory of `source`.
    View { source: ValueId, offset: usize, size: usize },
}

/// Allocations plus the binding of every value into them.
#[derive(Debug, Clone, Default)]
pub struct AllocationTable {
    allocations: Vec<BufferAllocation>,
    bindings: HashMap<ValueId, ValueBinding>,
}

impl AllocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an allocation of `size` bytes, returning its index.
    pub fn allocate(&mut self, size: usize, kind: AllocationKind) -> usize {
        let index = self.allocations.len();
        self.allocations.push(BufferAllocation { index, size, kind });
        index
    }

    /// Bind `value` directly to `slice`, replacing any earlier binding.
    pub fn bind(&mut self, value: ValueId, slice: BufferSlice) {
        self.bindings.insert(value, ValueBinding::Slice(slice));
    }

    /// Bind `value` as a view into the memory of `source`.
    pub fn bind_view(&mut self, value: ValueId, source: ValueId, offset: usize, size: usize) {
        self.bindings.insert(value, ValueBinding::View { source, offset, size });
    }

    pub fn allocation(&self, index: usize) -> Option<&BufferAllocation> {
        self.allocations.get(index)
    }

    pub fn allocations(&self) -> &[BufferAllocation] {
        &self.allocations
    }

    pub fn binding(&self, value: ValueId) -> Option<&ValueBinding> {
        self.bindings.get(&value)
    }
}

/// Slice a value resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlice {
    pub slice: BufferSlice,
    /// Global symbol of the allocation, when it holds a constant.
    pub constant_name: Option<String>,
}

/// Resolve `value` to the allocation slice backing it.
///
/// Views are followed to the value that owns the memory, accumulating byte
/// offsets on the way. The resolved slice has the size of `value`'s own
/// binding.
///
/// # Errors
/// - [`Error::ValueNotFound`](crate::Error::ValueNotFound) if `value`, or a
///   value in its view chain, has no binding.
/// - [`Error::InvalidSlice`](crate::Error::InvalidSlice) if the binding does
///   not fit inside its allocation.
/// - [`Error::UnknownAllocation`](crate::Error::UnknownAllocation) or
///   [`Error::CyclicView`](crate::Error::CyclicView) for a malformed table.
pub fn resolve_slice(value: ValueId, table: &AllocationTable) -> Result<ResolvedSlice> {
    let mut visited: SmallVec<[ValueId; 4]> = SmallVec::new();
    let mut current = value;
    let mut offset = 0;
    let mut size = None;

    let slice = loop {
        ensure!(!visited.contains(&current), CyclicViewSnafu { value });
        visited.push(current);

        match *table.binding(current).context(ValueNotFoundSnafu { value: current })? {
            ValueBinding::Slice(slice) => {
                let offset = slice.offset.saturating_add(offset);
                break BufferSlice::new(slice.allocation, offset, size.unwrap_or(slice.size));
            }
            ValueBinding::View { source, offset: view_offset, size: view_size } => {
                offset = offset.saturating_add(view_offset);
                size = size.or(Some(view_size));
                current = source;
            }
        }
    };

    let allocation =
        table.allocation(slice.allocation).context(UnknownAllocationSnafu { value, allocation: slice.allocation })?;
    ensure!(
        slice.offset.checked_add(slice.size).is_some_and(|end| end <= allocation.size),
        InvalidSliceSnafu {
            value,
            allocation: slice.allocation,
            offset: slice.offset,
            size: slice.size,
            allocation_size: allocation.size,
        }
    );

    tracing::trace!(%value, %slice, hops = visited.len(), "resolved allocation slice");
    Ok(ResolvedSlice { slice, constant_name: allocation.constant_name().map(str::to_string) })
}
