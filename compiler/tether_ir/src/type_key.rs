//! Stable type identity handle.
//!
//! `TypeKey` is the identity of a reflected type for the duration of a run.
//! Every cross-reference in the reflected model (base types, parameter types,
//! generic arguments) is a key into the [`TypeUniverse`](crate::TypeUniverse)
//! arena, never an embedded reference.
//!
//! # Design
//!
//! - 32-bit indices, `Copy`, O(1) equality
//! - Builtin runtime types have fixed keys (0-19) and are registered when the
//!   universe is created
//! - Keys from `FIRST_DYNAMIC` upward are handed out in registration order

use std::fmt;

/// A 32-bit index into the type universe.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeKey(u32);

impl TypeKey {
    // === Builtin Types (keys 0-19) ===

    /// `System.Void`.
    pub const VOID: Self = Self(0);
    /// `System.Boolean`.
    pub const BOOL: Self = Self(1);
    /// `System.Char` (UTF-16 code unit).
    pub const CHAR: Self = Self(2);
    /// `System.SByte`.
    pub const SBYTE: Self = Self(3);
    /// `System.Byte`.
    pub const BYTE: Self = Self(4);
    /// `System.Int16`.
    pub const INT16: Self = Self(5);
    /// `System.UInt16`.
    pub const UINT16: Self = Self(6);
    /// `System.Int32`.
    pub const INT32: Self = Self(7);
    /// `System.UInt32`.
    pub const UINT32: Self = Self(8);
    /// `System.Int64`.
    pub const INT64: Self = Self(9);
    /// `System.UInt64`.
    pub const UINT64: Self = Self(10);
    /// `System.Single`.
    pub const FLOAT32: Self = Self(11);
    /// `System.Double`.
    pub const FLOAT64: Self = Self(12);
    /// `System.IntPtr`.
    pub const INTPTR: Self = Self(13);
    /// `System.UIntPtr`.
    pub const UINTPTR: Self = Self(14);
    /// `System.String`.
    pub const STRING: Self = Self(15);
    /// `System.Object`, root of every reference type.
    pub const OBJECT: Self = Self(16);
    /// `System.Delegate`.
    pub const DELEGATE: Self = Self(17);
    /// `System.MulticastDelegate`, base of every declared delegate.
    pub const MULTICAST_DELEGATE: Self = Self(18);
    /// `System.ReadOnlySpan<System.Byte>`.
    pub const READ_ONLY_SPAN_OF_BYTE: Self = Self(19);

    /// Number of builtin types.
    pub const BUILTIN_COUNT: u32 = 20;

    /// First key handed out for registered (non-builtin) types.
    pub const FIRST_DYNAMIC: u32 = 32;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this key names a builtin runtime type.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }

    #[inline]
    pub const fn is_void(self) -> bool {
        self.0 == Self::VOID.0
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.0)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
