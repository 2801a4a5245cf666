//! Errors raised while describing types and looking up conversions.

use tether_ir::{CodeLanguage, TypeKey};

use crate::ValueKind;

/// Failure to build a descriptor for a reflected type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// The type has no namespace-qualified name (open generic parameters,
    /// some compiler-generated types). Nothing can be named after it.
    #[error("type `{name}` has no full name")]
    NoFullName { name: String },

    #[error("type key {key} is not known to the reflection source")]
    UnknownType { key: TypeKey },

    /// The type reaches itself through its generic arguments, array element
    /// or nullable inner type.
    #[error("type `{full_name}` refers to itself while being described")]
    Cycle { full_name: String },
}

/// Failure to produce a conversion between two representations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The two representations never talk to each other directly.
    #[error("no conversion path from {from} to {to}")]
    UnsupportedPair { from: CodeLanguage, to: CodeLanguage },

    /// The table knows the kind but explicitly rejects this direction.
    #[error("{kind} values cannot be converted from {from} to {to}")]
    Unsupported {
        kind: ValueKind,
        from: CodeLanguage,
        to: CodeLanguage,
    },

    /// The descriptor's kind has no conversion rules at all.
    #[error("type `{type_name}` has an unrecognized value kind ({what})")]
    UnrecognizedKind { type_name: String, what: &'static str },

    #[error("conversion template `{pattern}` must contain exactly one `{{0}}` placeholder")]
    MalformedTemplate { pattern: String },
}
