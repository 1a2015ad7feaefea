use crate::*;
use proptest::prelude::*;

pub fn integral_type() -> impl Strategy<Value = PrimitiveType> {
    prop_oneof![
        Just(PrimitiveType::S8),
        Just(PrimitiveType::S16),
        Just(PrimitiveType::S32),
        Just(PrimitiveType::S64),
        Just(PrimitiveType::U8),
        Just(PrimitiveType::U16),
        Just(PrimitiveType::U32),
        Just(PrimitiveType::U64),
    ]
}

pub fn float_type() -> impl Strategy<Value = PrimitiveType> {
    prop_oneof![
        Just(PrimitiveType::F16),
        Just(PrimitiveType::BF16),
        Just(PrimitiveType::F32),
        Just(PrimitiveType::F64),
    ]
}

pub fn primitive_type() -> impl Strategy<Value = PrimitiveType> {
    prop_oneof![
        Just(PrimitiveType::Pred),
        integral_type(),
        float_type(),
        Just(PrimitiveType::C64),
        Just(PrimitiveType::C128),
    ]
}
