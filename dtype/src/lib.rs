//! Element types of array values seen by the GPU emission analysis.
//!
//! Only the facts the analysis needs are modelled: bit width, byte size and
//! the numeric family of each type. Tuple and token types never reach the
//! analysis as element types and are not represented.


/// Primitive element type of an array shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::VariantArray, strum::AsRefStr, strum::Display)]
#[cfg_attr(feature = "proptest", derive(proptest_derive::Arbitrary))]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveType {
    /// Predicate (boolean), stored as one byte.
    Pred,

    S8,
    S16,
    S32,
    S64,

    U8,
    U16,
    U32,
    U64,

    F16,
    BF16,
    F32,
    F64,

    /// Complex with two `f32` components.
    C64,
    /// Complex with two `f64` components.
    C128,
}

impl PrimitiveType {
    /// Width of one element in bits.
    pub const fn bits(&self) -> u32 {
        match self {
            Self::Pred | Self::S8 | Self::U8 => 8,
            Self::S16 | Self::U16 | Self::F16 | Self::BF16 => 16,
            Self::S32 | Self::U32 | Self::F32 => 32,
            Self::S64 | Self::U64 | Self::F64 | Self::C64 => 64,
            Self::C128 => 128,
        }
    }

    pub const fn bytes(&self) -> usize {
        (self.bits() / 8) as usize
    }

    pub const fn is_pred(&self) -> bool {
        matches!(self, Self::Pred)
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::S8 | Self::S16 | Self::S32 | Self::S64)
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    pub const fn is_integral(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F16 | Self::BF16 | Self::F32 | Self::F64)
    }

    pub const fn is_complex(&self) -> bool {
        matches!(self, Self::C64 | Self::C128)
    }

    /// Returns the narrowest type (by bit width) in `types`.
    ///
    /// Ties keep the first occurrence.
    pub fn narrowest(types: impl IntoIterator<Item = PrimitiveType>) -> Option<PrimitiveType> {
        types.into_iter().reduce(|acc, ty| if ty.bits() < acc.bits() { ty } else { acc })
    }
}
