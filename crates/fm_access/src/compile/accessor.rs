use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::AccessError;
use crate::info::{MemberDescriptor, MemberKind, Type};

// -----------------------------------------------------------------------------
// Getter & Setter

type GetFn = dyn Fn(&dyn Any) -> Result<Box<dyn Any>, AccessError> + Send + Sync;
type SetFn = dyn Fn(&mut dyn Any, Box<dyn Any>) -> Result<(), AccessError> + Send + Sync;

/// A compiled, type-erased member read.
///
/// Cloning is cheap, the compiled closure is shared.
#[derive(Clone)]
pub struct Getter {
    member: &'static str,
    value_type: Type,
    func: Arc<GetFn>,
}

impl Getter {
    #[inline]
    pub(crate) fn new<V: Any>(
        member: &'static str,
        func: impl Fn(&dyn Any) -> Result<Box<dyn Any>, AccessError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            member,
            value_type: Type::of::<V>(),
            func: Arc::new(func),
        }
    }

    /// Reads the member from `instance`, boxed.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if `instance` is not of the declaring type.
    #[inline]
    pub fn get(&self, instance: &dyn Any) -> Result<Box<dyn Any>, AccessError> {
        (self.func)(instance)
    }

    /// Reads the member from `instance` as a `V`.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if `instance` is not of the declaring
    /// type, or if `V` is not the member type.
    pub fn get_as<V: Any>(&self, instance: &dyn Any) -> Result<V, AccessError> {
        if !self.value_type.is::<V>() {
            return Err(AccessError::value_mismatch(self.member, self.value_type.path()));
        }
        let value = self.get(instance)?;
        value
            .downcast::<V>()
            .map(|v| *v)
            .map_err(|_| AccessError::value_mismatch(self.member, self.value_type.path()))
    }

    #[inline]
    pub fn value_type(&self) -> Type {
        self.value_type
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("member", &self.member)
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

/// A compiled, type-erased member write.
///
/// Values must have exactly the member type, no conversion is attempted.
#[derive(Clone)]
pub struct Setter {
    member: &'static str,
    value_type: Type,
    func: Arc<SetFn>,
}

impl Setter {
    #[inline]
    pub(crate) fn new<V: Any>(
        member: &'static str,
        func: impl Fn(&mut dyn Any, Box<dyn Any>) -> Result<(), AccessError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            member,
            value_type: Type::of::<V>(),
            func: Arc::new(func),
        }
    }

    /// Writes a boxed `value` into the member of `instance`.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if `instance` is not of the declaring
    /// type, or `value` is not of the member type. `instance` is left
    /// untouched in both cases.
    #[inline]
    pub fn set(&self, instance: &mut dyn Any, value: Box<dyn Any>) -> Result<(), AccessError> {
        (self.func)(instance, value)
    }

    /// Typed shorthand for [`Setter::set`].
    ///
    /// # Errors
    ///
    /// Same as [`Setter::set`].
    #[inline]
    pub fn set_value<V: Any>(&self, instance: &mut dyn Any, value: V) -> Result<(), AccessError> {
        self.set(instance, Box::new(value))
    }

    #[inline]
    pub fn value_type(&self) -> Type {
        self.value_type
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("member", &self.member)
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// AccessorPair

/// The compiled getter and setter of one member.
///
/// Either side is `None` when the member does not support that direction.
#[derive(Clone)]
pub struct AccessorPair {
    declaring: Type,
    name: &'static str,
    value_type: Type,
    kind: MemberKind,
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl AccessorPair {
    #[inline]
    pub fn declaring(&self) -> Type {
        self.declaring
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn value_type(&self) -> Type {
        self.value_type
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn getter(&self) -> Option<&Getter> {
        self.getter.as_ref()
    }

    #[inline]
    pub fn setter(&self) -> Option<&Setter> {
        self.setter.as_ref()
    }

    #[inline]
    pub fn can_read(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }
}

impl fmt::Debug for AccessorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorPair")
            .field("declaring", &self.declaring)
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("kind", &self.kind)
            .field("can_read", &self.can_read())
            .field("can_write", &self.can_write())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// AccessorCompiler

/// Compiles [`MemberDescriptor`]s into [`Getter`]s and [`Setter`]s.
///
/// Compilation never fails. A direction the member does not support
/// compiles to `None`:
///
/// - indexers have neither side;
/// - read-only members have no setter;
/// - properties without a get function have no getter.
///
/// # Examples
///
/// ```
/// use fm_access::compile::AccessorCompiler;
/// use fm_access::info::MemberDescriptor;
///
/// struct Counter { hits: u32 }
///
/// let hits = MemberDescriptor::field::<Counter, u32>("hits", |c| &c.hits, |c| &mut c.hits);
/// let pair = AccessorCompiler::compile(&hits);
///
/// let mut counter = Counter { hits: 1 };
/// pair.setter().unwrap().set_value(&mut counter, 7_u32).unwrap();
/// assert_eq!(pair.getter().unwrap().get_as::<u32>(&counter).unwrap(), 7);
/// ```
pub struct AccessorCompiler;

impl AccessorCompiler {
    /// Compiles the read side of `member`.
    ///
    /// Returns `None` for indexers and write-only properties.
    pub fn compile_getter(member: &MemberDescriptor) -> Option<Getter> {
        let getter = member.source().and_then(|source| source.emit_getter(member.name()));
        if getter.is_none() {
            log::debug!(
                "{} `{}::{}` has no zero-argument getter, not readable.",
                member.kind(),
                member.declaring().short_path(),
                member.name(),
            );
        }
        getter
    }

    /// Compiles the write side of `member`.
    ///
    /// Returns `None` for indexers and read-only members.
    pub fn compile_setter(member: &MemberDescriptor) -> Option<Setter> {
        let setter = match member.is_read_only() {
            true => None,
            false => member.source().and_then(|source| source.emit_setter(member.name())),
        };
        if setter.is_none() {
            log::debug!(
                "{} `{}::{}` ({:?}) has no setter, not writable.",
                member.kind(),
                member.declaring().short_path(),
                member.name(),
                member.mutability(),
            );
        }
        setter
    }

    /// Compiles both sides of `member`.
    pub fn compile(member: &MemberDescriptor) -> AccessorPair {
        AccessorPair {
            declaring: member.declaring(),
            name: member.name(),
            value_type: member.value_type(),
            kind: member.kind(),
            getter: Self::compile_getter(member),
            setter: Self::compile_setter(member),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::AccessorCompiler;
    use crate::info::{MemberDescriptor, Type};
    use crate::{AccessError, MismatchTarget};
    use alloc::boxed::Box;
    use alloc::string::String;

    #[derive(Default)]
    struct Sample {
        field: String,
        amount: i64,
        flags: u8,
    }

    impl Sample {
        fn amount(&self) -> i64 {
            self.amount
        }

        fn set_amount(&mut self, value: i64) {
            self.amount = value;
        }
    }

    fn field() -> MemberDescriptor {
        MemberDescriptor::field::<Sample, String>("field", |s| &s.field, |s| &mut s.field)
    }

    #[test]
    fn field_round_trip() {
        let pair = AccessorCompiler::compile(&field());
        let mut sample = Sample::default();

        let setter = pair.setter().unwrap();
        setter.set_value(&mut sample, String::from("abc")).unwrap();
        assert_eq!(sample.field, "abc");

        let getter = pair.getter().unwrap();
        assert_eq!(getter.get_as::<String>(&sample).unwrap(), "abc");
        assert_eq!(getter.value_type(), Type::of::<String>());
    }

    #[test]
    fn property_calls_functions() {
        let amount = MemberDescriptor::property::<Sample, i64>(
            "Amount",
            Some(Sample::amount),
            Some(Sample::set_amount),
        );
        let pair = AccessorCompiler::compile(&amount);
        let mut sample = Sample::default();

        pair.setter().unwrap().set_value(&mut sample, -3_i64).unwrap();
        assert_eq!(sample.amount, -3);
        let boxed = pair.getter().unwrap().get(&sample).unwrap();
        assert_eq!(*boxed.downcast::<i64>().unwrap(), -3);
    }

    #[test]
    fn unsupported_directions_are_absent() {
        let flags = MemberDescriptor::readonly_field::<Sample, u8>("flags", |s| &s.flags);
        let pair = AccessorCompiler::compile(&flags);
        assert!(pair.can_read());
        assert!(!pair.can_write());

        let write_only =
            MemberDescriptor::property::<Sample, i64>("Sink", None, Some(Sample::set_amount));
        let pair = AccessorCompiler::compile(&write_only);
        assert!(!pair.can_read());
        assert!(pair.can_write());

        let item = MemberDescriptor::indexer::<Sample, u8>("Item");
        let pair = AccessorCompiler::compile(&item);
        assert!(!pair.can_read());
        assert!(!pair.can_write());
    }

    #[test]
    fn single_direction_compilers() {
        let locked = field().read_only();
        assert!(AccessorCompiler::compile_getter(&locked).is_some());
        assert!(AccessorCompiler::compile_setter(&locked).is_none());

        let write_only =
            MemberDescriptor::property::<Sample, i64>("Sink", None, Some(Sample::set_amount));
        assert!(AccessorCompiler::compile_getter(&write_only).is_none());
        assert!(AccessorCompiler::compile_setter(&write_only).is_some());

        let read_only =
            MemberDescriptor::property::<Sample, i64>("Amount", Some(Sample::amount), None);
        assert!(AccessorCompiler::compile_getter(&read_only).is_some());
        assert!(AccessorCompiler::compile_setter(&read_only).is_none());

        let item = MemberDescriptor::indexer::<Sample, u8>("Item");
        assert!(AccessorCompiler::compile_getter(&item).is_none());
        assert!(AccessorCompiler::compile_setter(&item).is_none());
    }

    #[test]
    fn wrong_instance_or_value() {
        let pair = AccessorCompiler::compile(&field());
        let getter = pair.getter().unwrap();
        let setter = pair.setter().unwrap();

        let err = getter.get(&5_u32).unwrap_err();
        assert!(matches!(
            err,
            AccessError::TypeMismatch { member: "field", target: MismatchTarget::Instance, .. }
        ));

        let mut sample = Sample::default();
        let err = setter.set(&mut sample, Box::new(5_u32)).unwrap_err();
        assert!(matches!(
            err,
            AccessError::TypeMismatch { target: MismatchTarget::Value, .. }
        ));
        assert!(sample.field.is_empty());

        let err = getter.get_as::<u32>(&sample).unwrap_err();
        assert!(matches!(
            err,
            AccessError::TypeMismatch { target: MismatchTarget::Value, .. }
        ));
    }
}
