//! Items referenced by code that `#[derive(Mappable)]` generates.
//!
//! Not part of the public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

    /// A registration function submitted by a derived type.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    /// Registered together with the derived types; its presence proves the
    /// platform runs `inventory` constructors.
    pub struct __AvailFlag;

    impl GetTypeMeta for __AvailFlag {
        fn get_type_meta() -> TypeMeta {
            TypeMeta::of::<Self>()
        }
    }

    inventory::submit! {
        __AutoRegisterFunc(<__AvailFlag as __RegisterType>::__register)
    }

    pub(crate) fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
