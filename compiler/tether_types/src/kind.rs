//! Value kinds: how a type crosses the native boundary.

use std::fmt;

use tether_ir::{PrimitiveKind, TypeKind};

/// Marshalling category of a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Passed as-is, modulo signedness or width adjustments.
    Primitive(PrimitiveKind),
    /// Passed as its underlying primitive.
    Enum,
    /// Passed as a managed string handle.
    String,
    /// `Nullable<T>`: boxed on the native side, optional in hosts.
    OptionalWrapper,
    /// Any managed object, passed as an opaque handle.
    ReferenceObject,
    /// `ReadOnlySpan<byte>`, passed as pointer plus length.
    ReadOnlyByteSpan,
    /// A referenced storage location (`ref` parameters).
    ByRef,
}

impl ValueKind {
    /// Kinds whose host form is a handle that may be absent.
    pub const fn is_reference_like(self) -> bool {
        matches!(
            self,
            ValueKind::String | ValueKind::ReferenceObject | ValueKind::OptionalWrapper
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Primitive(prim) => write!(f, "primitive {}", prim.runtime_name()),
            ValueKind::Enum => f.write_str("enum"),
            ValueKind::String => f.write_str("string"),
            ValueKind::OptionalWrapper => f.write_str("optional wrapper"),
            ValueKind::ReferenceObject => f.write_str("reference object"),
            ValueKind::ReadOnlyByteSpan => f.write_str("read-only byte span"),
            ValueKind::ByRef => f.write_str("by-ref"),
        }
    }
}

/// Classification of a described type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// No value at all. Only valid as a return type.
    Void,
    Value(ValueKind),
    /// Nameable, but with no marshalling rules.
    Unrecognized(&'static str),
}

impl DescriptorKind {
    pub fn classify(kind: &TypeKind) -> Self {
        match kind {
            TypeKind::Void => DescriptorKind::Void,
            TypeKind::Primitive(prim) => DescriptorKind::Value(ValueKind::Primitive(*prim)),
            TypeKind::Enum { .. } => DescriptorKind::Value(ValueKind::Enum),
            TypeKind::String => DescriptorKind::Value(ValueKind::String),
            TypeKind::Class
            | TypeKind::Interface
            | TypeKind::Struct
            | TypeKind::Delegate
            | TypeKind::Array { .. }
            | TypeKind::GenericInstance { .. } => DescriptorKind::Value(ValueKind::ReferenceObject),
            TypeKind::Nullable { .. } => DescriptorKind::Value(ValueKind::OptionalWrapper),
            TypeKind::ReadOnlySpanOfByte => DescriptorKind::Value(ValueKind::ReadOnlyByteSpan),
            TypeKind::Pointer { .. } => DescriptorKind::Unrecognized("unmanaged pointer"),
            TypeKind::GenericParameter => DescriptorKind::Unrecognized("open generic parameter"),
        }
    }

    pub const fn value_kind(self) -> Option<ValueKind> {
        match self {
            DescriptorKind::Value(kind) => Some(kind),
            DescriptorKind::Void | DescriptorKind::Unrecognized(_) => None,
        }
    }

    pub const fn is_void(self) -> bool {
        matches!(self, DescriptorKind::Void)
    }
}
