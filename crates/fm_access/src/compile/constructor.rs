use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::AccessError;
use crate::info::Type;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// CompiledFactory

type CreateFn = dyn Fn() -> Box<dyn Any> + Send + Sync;

/// A compiled parameterless constructor.
#[derive(Clone)]
pub struct CompiledFactory {
    ty: Type,
    func: Arc<CreateFn>,
}

impl CompiledFactory {
    #[inline]
    pub(crate) fn new(ty: Type, func: impl Fn() -> Box<dyn Any> + Send + Sync + 'static) -> Self {
        Self {
            ty,
            func: Arc::new(func),
        }
    }

    /// Returns the type this factory creates.
    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Creates a new, boxed instance.
    #[inline]
    pub fn create(&self) -> Box<dyn Any> {
        (self.func)()
    }

    /// Creates a new instance as a `T`.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if `T` is not the factory type.
    pub fn create_as<T: Any>(&self) -> Result<T, AccessError> {
        if !self.ty.is::<T>() {
            return Err(AccessError::value_mismatch("<constructor>", self.ty.path()));
        }
        self.create()
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| AccessError::value_mismatch("<constructor>", self.ty.path()))
    }

    /// Returns `true` if both handles share the same compiled closure.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for CompiledFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFactory")
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ConstructorCompiler

/// Compiles the registered parameterless constructor of a type.
///
/// The constructor may be private to the type's module; it only has to be
/// registered in the [`TypeMeta`](crate::registry::TypeMeta).
pub struct ConstructorCompiler;

impl ConstructorCompiler {
    /// Compiles the constructor of `ty`.
    ///
    /// # Errors
    ///
    /// [`AccessError::NoDefaultConstructor`] if `ty` is not registered or was
    /// registered without a constructor. The result is deterministic, it
    /// depends only on the registry content.
    pub fn compile_constructor(
        registry: &TypeRegistry,
        ty: Type,
    ) -> Result<CompiledFactory, AccessError> {
        let Some(source) = registry.get(ty.id()).and_then(|meta| meta.constructor_source()) else {
            log::debug!("Type `{}` has no parameterless constructor.", ty.path());
            return Err(AccessError::NoDefaultConstructor {
                type_path: ty.path(),
            });
        };
        Ok(source.emit())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ConstructorCompiler;
    use crate::AccessError;
    use crate::info::Type;
    use crate::registry::{TypeMeta, TypeRegistry};

    #[derive(Debug, PartialEq)]
    struct Hidden {
        tag: &'static str,
    }

    impl Hidden {
        fn hidden() -> Self {
            Self { tag: "private" }
        }
    }

    struct NoCtor;

    #[test]
    fn private_constructor() {
        let mut registry = TypeRegistry::empty();
        registry.insert_type_meta(TypeMeta::of::<Hidden>().with_constructor(Hidden::hidden));

        let factory =
            ConstructorCompiler::compile_constructor(&registry, Type::of::<Hidden>()).unwrap();
        assert_eq!(factory.ty(), Type::of::<Hidden>());
        assert_eq!(factory.create_as::<Hidden>().unwrap(), Hidden { tag: "private" });
        assert!(factory.create_as::<u8>().is_err());
    }

    #[test]
    fn missing_constructor() {
        let mut registry = TypeRegistry::empty();
        registry.insert_type_meta(TypeMeta::of::<NoCtor>());

        for ty in [Type::of::<NoCtor>(), Type::of::<u128>()] {
            let err = ConstructorCompiler::compile_constructor(&registry, ty).unwrap_err();
            assert_eq!(err, AccessError::NoDefaultConstructor { type_path: ty.path() });
        }
    }
}
