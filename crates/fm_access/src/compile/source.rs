//! Statically typed member and constructor sources.
//!
//! A source is the monomorphized half of a descriptor: it knows the concrete
//! `T` and `V`, and emits closures that downcast once and then access the
//! member directly.

use alloc::boxed::Box;
use core::any::{Any, type_name};

use crate::AccessError;
use crate::compile::{CompiledFactory, Getter, Setter};
use crate::info::Type;

// -----------------------------------------------------------------------------
// MemberSource

pub(crate) trait MemberSource: Send + Sync + 'static {
    /// Emits the getter, or `None` if the member can not be read.
    fn emit_getter(&self, member: &'static str) -> Option<Getter>;

    /// Emits the setter, or `None` if the member can not be written.
    fn emit_setter(&self, member: &'static str) -> Option<Setter>;
}

// -----------------------------------------------------------------------------
// FieldSource

pub(crate) struct FieldSource<T, V> {
    read: fn(&T) -> &V,
    write: Option<fn(&mut T) -> &mut V>,
}

impl<T, V> FieldSource<T, V> {
    #[inline]
    pub(crate) const fn new(read: fn(&T) -> &V, write: Option<fn(&mut T) -> &mut V>) -> Self {
        Self { read, write }
    }
}

impl<T: Any, V: Any + Clone> MemberSource for FieldSource<T, V> {
    fn emit_getter(&self, member: &'static str) -> Option<Getter> {
        let read = self.read;
        Some(Getter::new::<V>(member, move |instance: &dyn Any| {
            let this = instance
                .downcast_ref::<T>()
                .ok_or(AccessError::instance_mismatch(member, type_name::<T>()))?;
            // Clone so the result does not borrow from `instance`.
            Ok(Box::new(read(this).clone()) as Box<dyn Any>)
        }))
    }

    fn emit_setter(&self, member: &'static str) -> Option<Setter> {
        let write = self.write?;
        Some(Setter::new::<V>(
            member,
            move |instance: &mut dyn Any, value: Box<dyn Any>| {
                let this = instance
                    .downcast_mut::<T>()
                    .ok_or(AccessError::instance_mismatch(member, type_name::<T>()))?;
                let value = value
                    .downcast::<V>()
                    .map_err(|_| AccessError::value_mismatch(member, type_name::<V>()))?;
                *write(this) = *value;
                Ok(())
            },
        ))
    }
}

// -----------------------------------------------------------------------------
// PropertySource

pub(crate) struct PropertySource<T, V> {
    get: Option<fn(&T) -> V>,
    set: Option<fn(&mut T, V)>,
}

impl<T, V> PropertySource<T, V> {
    #[inline]
    pub(crate) const fn new(get: Option<fn(&T) -> V>, set: Option<fn(&mut T, V)>) -> Self {
        Self { get, set }
    }
}

impl<T: Any, V: Any> MemberSource for PropertySource<T, V> {
    fn emit_getter(&self, member: &'static str) -> Option<Getter> {
        let get = self.get?;
        Some(Getter::new::<V>(member, move |instance: &dyn Any| {
            let this = instance
                .downcast_ref::<T>()
                .ok_or(AccessError::instance_mismatch(member, type_name::<T>()))?;
            Ok(Box::new(get(this)) as Box<dyn Any>)
        }))
    }

    fn emit_setter(&self, member: &'static str) -> Option<Setter> {
        let set = self.set?;
        Some(Setter::new::<V>(
            member,
            move |instance: &mut dyn Any, value: Box<dyn Any>| {
                let this = instance
                    .downcast_mut::<T>()
                    .ok_or(AccessError::instance_mismatch(member, type_name::<T>()))?;
                let value = value
                    .downcast::<V>()
                    .map_err(|_| AccessError::value_mismatch(member, type_name::<V>()))?;
                set(this, *value);
                Ok(())
            },
        ))
    }
}

// -----------------------------------------------------------------------------
// ConstructorSource

pub(crate) trait ConstructorSource: Send + Sync + 'static {
    fn emit(&self) -> CompiledFactory;
}

/// A constructor backed by a plain function, of any visibility.
pub(crate) struct FnConstructor<T> {
    ctor: fn() -> T,
}

impl<T> FnConstructor<T> {
    #[inline]
    pub(crate) const fn new(ctor: fn() -> T) -> Self {
        Self { ctor }
    }
}

impl<T: Any> ConstructorSource for FnConstructor<T> {
    fn emit(&self) -> CompiledFactory {
        let ctor = self.ctor;
        CompiledFactory::new(Type::of::<T>(), move || Box::new(ctor()) as Box<dyn Any>)
    }
}
