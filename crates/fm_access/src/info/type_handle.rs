use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Type

/// The runtime handle of a Rust type.
///
/// Holds a [`TypeId`] and a function returning the type path.
/// Equality and hashing only look at the `TypeId`.
///
/// # Examples
///
/// ```
/// # use core::any::TypeId;
/// use fm_access::info::Type;
///
/// let ty = Type::of::<String>();
///
/// assert!(ty.is::<String>());
/// assert_eq!(ty.id(), TypeId::of::<String>());
/// assert_eq!(ty.path(), "alloc::string::String");
/// assert_eq!(ty.short_path().to_string(), "String");
/// ```
#[derive(Copy, Clone)]
pub struct Type {
    type_id: TypeId,
    type_path: fn() -> &'static str,
}

impl Type {
    /// The root object type, `dyn Any`.
    ///
    /// Every type is an `Any`, so there is nothing to map on it.
    pub const OBJECT: Type = Type::of::<dyn Any>();

    /// Creates the handle of `T`.
    #[inline]
    pub const fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: core::any::type_name::<T>,
        }
    }

    /// Returns the [`TypeId`] of the type.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type path, e.g. `alloc::vec::Vec<u8>`.
    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    /// Returns the type path with every module prefix removed.
    ///
    /// `alloc::vec::Vec<alloc::string::String>` displays as `Vec<String>`.
    #[inline]
    pub fn short_path(&self) -> ShortPath {
        ShortPath(self.path())
    }

    /// Check if the given type matches this one.
    #[inline(always)]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    /// Returns `true` for [`Type::OBJECT`].
    #[inline]
    pub fn is_object(&self) -> bool {
        self.type_id == TypeId::of::<dyn Any>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type").field(&self.path()).finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path())
    }
}

// -----------------------------------------------------------------------------
// ShortPath

/// A type path displayed without module prefixes.
///
/// Each path segment between delimiters (`<`, `(`, `[`, `,`, `;`, ...) is
/// shortened on its own, so tuples, arrays and generic arguments keep
/// their shape.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct ShortPath(&'static str);

impl ShortPath {
    #[inline]
    fn is_delimiter(c: char) -> bool {
        matches!(c, '<' | '>' | '(' | ')' | '[' | ']' | ',' | ';' | ' ' | '&' | '*')
    }
}

impl fmt::Display for ShortPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        loop {
            let end = rest.find(Self::is_delimiter).unwrap_or(rest.len());
            let segment = &rest[..end];
            match segment.rfind("::") {
                Some(index) => f.write_str(&segment[index + 2..])?,
                None => f.write_str(segment)?,
            }
            if end == rest.len() {
                return Ok(());
            }
            // Delimiters are ASCII.
            f.write_str(&rest[end..end + 1])?;
            rest = &rest[end + 1..];
        }
    }
}

impl fmt::Debug for ShortPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Type;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::any::Any;

    struct Local;

    mod a {
        pub struct X;
    }

    mod b {
        pub struct X;
    }

    fn short<T: ?Sized + 'static>() -> String {
        Type::of::<T>().short_path().to_string()
    }

    #[test]
    fn short_paths() {
        assert_eq!(short::<u32>(), "u32");
        assert_eq!(short::<String>(), "String");
        assert_eq!(short::<Local>(), "Local");
        assert_eq!(short::<Vec<String>>(), "Vec<String>");
        assert_eq!(short::<dyn Any>(), "dyn Any");
        assert_eq!(short::<&'static str>(), "&str");
    }

    #[test]
    fn short_paths_of_tuples_and_arrays() {
        assert_eq!(short::<(u8, String)>(), "(u8, String)");
        assert_eq!(short::<[String; 2]>(), "[String; 2]");
        assert_eq!(short::<(u8, a::X)>(), "(u8, X)");
        assert_ne!(short::<(u8, a::X)>(), short::<(i32, b::X)>());
        assert_eq!(short::<Option<(Local, [u8; 4])>>(), "Option<(Local, [u8; 4])>");
    }

    #[test]
    fn identity() {
        assert_eq!(Type::of::<u8>(), Type::of::<u8>());
        assert_ne!(Type::of::<u8>(), Type::of::<i8>());
        assert!(Type::OBJECT.is_object());
        assert!(Type::OBJECT.is::<dyn Any>());
        assert!(!Type::of::<Local>().is_object());
    }
}
