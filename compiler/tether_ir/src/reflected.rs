//! Reflected view of managed types.
//!
//! These are plain data records produced by a reflection source. They carry no
//! naming or conversion knowledge of their own; that lives in descriptors.

use crate::{Nullability, TypeKey};

/// Primitive value types with a fixed ABI representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    Bool,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    IntPtr,
    UIntPtr,
}

impl PrimitiveKind {
    /// Every primitive, in builtin key order.
    pub const ALL: [PrimitiveKind; 14] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::SByte,
        PrimitiveKind::Byte,
        PrimitiveKind::Int16,
        PrimitiveKind::UInt16,
        PrimitiveKind::Int32,
        PrimitiveKind::UInt32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::IntPtr,
        PrimitiveKind::UIntPtr,
    ];

    /// The builtin key of this primitive.
    pub const fn key(self) -> TypeKey {
        match self {
            PrimitiveKind::Bool => TypeKey::BOOL,
            PrimitiveKind::Char => TypeKey::CHAR,
            PrimitiveKind::SByte => TypeKey::SBYTE,
            PrimitiveKind::Byte => TypeKey::BYTE,
            PrimitiveKind::Int16 => TypeKey::INT16,
            PrimitiveKind::UInt16 => TypeKey::UINT16,
            PrimitiveKind::Int32 => TypeKey::INT32,
            PrimitiveKind::UInt32 => TypeKey::UINT32,
            PrimitiveKind::Int64 => TypeKey::INT64,
            PrimitiveKind::UInt64 => TypeKey::UINT64,
            PrimitiveKind::Float32 => TypeKey::FLOAT32,
            PrimitiveKind::Float64 => TypeKey::FLOAT64,
            PrimitiveKind::IntPtr => TypeKey::INTPTR,
            PrimitiveKind::UIntPtr => TypeKey::UINTPTR,
        }
    }

    /// Short runtime name (`Int32`, `Boolean`, ...).
    pub const fn runtime_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::SByte => "SByte",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::UInt16 => "UInt16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::UInt32 => "UInt32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::UInt64 => "UInt64",
            PrimitiveKind::Float32 => "Single",
            PrimitiveKind::Float64 => "Double",
            PrimitiveKind::IntPtr => "IntPtr",
            PrimitiveKind::UIntPtr => "UIntPtr",
        }
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::UInt16
                | PrimitiveKind::UInt32
                | PrimitiveKind::UInt64
                | PrimitiveKind::UIntPtr
        )
    }
}

/// Structural kind of a reflected type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    Void,
    Primitive(PrimitiveKind),
    Enum { underlying: PrimitiveKind },
    String,
    Class,
    Interface,
    Struct,
    Delegate,
    /// Single-dimensional array.
    Array { element: TypeKey },
    /// Constructed generic type. The owning type's `full_name` is the
    /// definition name (e.g. ``System.Collections.Generic.List`1``).
    GenericInstance { args: Vec<TypeKey> },
    /// `System.Nullable<T>` around a value type.
    Nullable { inner: TypeKey },
    /// `System.ReadOnlySpan<System.Byte>`.
    ReadOnlySpanOfByte,
    /// Unmanaged pointer.
    Pointer { pointee: TypeKey },
    /// Open generic parameter (`T`).
    GenericParameter,
}

impl TypeKind {
    /// Reference types are passed across the boundary as object handles.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            TypeKind::Class
                | TypeKind::Interface
                | TypeKind::Delegate
                | TypeKind::Array { .. }
                | TypeKind::String
                | TypeKind::GenericInstance { .. }
        )
    }
}

/// How a parameter is passed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamMode {
    #[default]
    ByValue,
    Ref,
    In,
    Out,
}

impl ParamMode {
    pub const fn is_by_value(self) -> bool {
        matches!(self, ParamMode::ByValue)
    }
}

/// One parameter of a delegate's invoke signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamInfo {
    pub name: String,
    /// The parameter's element type. For `Ref`/`In`/`Out` this is the
    /// referenced type, not a by-ref wrapper.
    pub ty: TypeKey,
    pub mode: ParamMode,
    /// Member-level annotation; overrides the type's default.
    pub nullability: Nullability,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, ty: TypeKey) -> Self {
        ParamInfo {
            name: name.into(),
            ty,
            mode: ParamMode::ByValue,
            nullability: Nullability::NotSpecified,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ParamMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_nullability(mut self, nullability: Nullability) -> Self {
        self.nullability = nullability;
        self
    }
}

/// Signature of a delegate's `Invoke` method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvokeSignature {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeKey,
    pub return_nullability: Nullability,
    pub returns_by_ref: bool,
}

impl InvokeSignature {
    pub fn new(params: Vec<ParamInfo>, return_type: TypeKey) -> Self {
        InvokeSignature {
            params,
            return_type,
            return_nullability: Nullability::NotSpecified,
            returns_by_ref: false,
        }
    }

    /// Two signatures match when they return the same type and take the
    /// same parameter types in the same modes. Parameter names are ignored.
    pub fn matches(&self, other: &InvokeSignature) -> bool {
        self.return_type == other.return_type
            && self.returns_by_ref == other.returns_by_ref
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.ty == b.ty && a.mode == b.mode)
    }
}

/// A single reflected type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReflectedType {
    /// Short name, e.g. `Callback`.
    pub name: String,
    /// Namespace-qualified name. Absent for open generic parameters and for
    /// some compiler-generated types.
    pub full_name: Option<String>,
    pub kind: TypeKind,
    pub base: Option<TypeKey>,
    /// Type-level nullability annotation.
    pub nullability: Nullability,
    /// Present on delegates.
    pub invoke: Option<InvokeSignature>,
}

impl ReflectedType {
    pub fn new(name: impl Into<String>, full_name: Option<String>, kind: TypeKind) -> Self {
        ReflectedType {
            name: name.into(),
            full_name,
            kind,
            base: None,
            nullability: Nullability::NotSpecified,
            invoke: None,
        }
    }

    /// A named delegate type deriving from `System.MulticastDelegate`.
    pub fn delegate(full_name: &str, invoke: InvokeSignature) -> Self {
        let name = full_name.rsplit('.').next().unwrap_or(full_name);
        ReflectedType {
            base: Some(TypeKey::MULTICAST_DELEGATE),
            invoke: Some(invoke),
            ..ReflectedType::new(name, Some(full_name.to_owned()), TypeKind::Delegate)
        }
    }

    /// A named class deriving from `System.Object`.
    pub fn class(full_name: &str) -> Self {
        let name = full_name.rsplit('.').next().unwrap_or(full_name);
        ReflectedType {
            base: Some(TypeKey::OBJECT),
            ..ReflectedType::new(name, Some(full_name.to_owned()), TypeKind::Class)
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeKey) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_nullability(mut self, nullability: Nullability) -> Self {
        self.nullability = nullability;
        self
    }

    /// Full name if present, short name otherwise.
    pub fn full_name_or_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_delegate(&self) -> bool {
        matches!(self.kind, TypeKind::Delegate)
    }
}
