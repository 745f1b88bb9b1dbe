use alloc::string::String;

use crate::registry::{GetTypeMeta, TypeMeta};

// Value types: no members, the zero value as constructor.
macro_rules! impl_value_type {
    ($($ty:ty),* $(,)?) => {
        $(
            impl GetTypeMeta for $ty {
                #[inline]
                fn get_type_meta() -> TypeMeta {
                    TypeMeta::of::<Self>().with_default::<Self>()
                }
            }
        )*
    };
}

impl_value_type!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
);
