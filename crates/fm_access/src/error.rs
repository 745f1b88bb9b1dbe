use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Which side of an accessor call had the wrong runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchTarget {
    /// The object passed as `instance` is not of the declaring type.
    Instance,
    /// The value passed to a setter is not of the member type.
    Value,
}

impl core::fmt::Display for MismatchTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Instance => f.pad("instance"),
            Self::Value => f.pad("value"),
        }
    }
}

/// Errors raised by compiled accessors and constructors.
///
/// A member direction that does not exist (no setter on a read-only field,
/// an indexer, ...) is not an error: the corresponding side of the
/// [`AccessorPair`](crate::compile::AccessorPair) is simply `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("type `{type_path}` has no accessible parameterless constructor")]
    NoDefaultConstructor { type_path: &'static str },

    #[error("type mismatch on `{member}`: {target} is not of type `{expected}`")]
    TypeMismatch {
        member: &'static str,
        expected: &'static str,
        target: MismatchTarget,
    },
}

impl AccessError {
    #[inline]
    pub(crate) fn instance_mismatch(member: &'static str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            member,
            expected,
            target: MismatchTarget::Instance,
        }
    }

    #[inline]
    pub(crate) fn value_mismatch(member: &'static str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            member,
            expected,
            target: MismatchTarget::Value,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{AccessError, MismatchTarget};
    use alloc::string::ToString;

    #[test]
    fn display() {
        let err = AccessError::NoDefaultConstructor { type_path: "app::Foo" };
        assert_eq!(
            err.to_string(),
            "type `app::Foo` has no accessible parameterless constructor"
        );

        let err = AccessError::value_mismatch("count", "u32");
        assert_eq!(
            err.to_string(),
            "type mismatch on `count`: value is not of type `u32`"
        );
        assert!(matches!(
            err,
            AccessError::TypeMismatch { target: MismatchTarget::Value, .. }
        ));
    }
}
