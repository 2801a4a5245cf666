//! Conversion templates and the table they come from.
//!
//! A [`ConversionTemplate`] is a pattern with exactly one `{0}` placeholder
//! for the source expression. The [`ConversionTemplateTable`] is the finite set
//! of patterns keyed by (value kind, source representation, target
//! representation). Patterns may also mention `{T}`, the host-side type name,
//! which descriptors fill in once when they are built.
//!
//! # Supported pairs
//!
//! | From       | To         |
//! |------------|------------|
//! | Kotlin     | KotlinJNA  |
//! | KotlinJNA  | Kotlin     |
//! | Swift      | C          |
//! | C          | Swift      |
//!
//! Same-representation conversions are identity. Every other pair is an
//! error, never a guess.

use tether_ir::{CodeLanguage, PrimitiveKind};

use crate::{ConversionError, ResolvedNullability, ValueKind};

/// Token replaced with the source expression.
pub const PLACEHOLDER: &str = "{0}";

/// Token replaced with the host-side type name when a descriptor is built.
pub const TYPE_TOKEN: &str = "{T}";

/// A single-placeholder conversion pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConversionTemplate {
    pattern: String,
}

impl ConversionTemplate {
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConversionError> {
        let pattern = pattern.into();
        if pattern.matches(PLACEHOLDER).count() == 1 {
            Ok(ConversionTemplate { pattern })
        } else {
            Err(ConversionError::MalformedTemplate { pattern })
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Substitute `expr` for the placeholder.
    pub fn apply(&self, expr: &str) -> String {
        self.pattern.replacen(PLACEHOLDER, expr, 1)
    }
}

/// One row of the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableEntry {
    /// The source expression is usable unchanged.
    Identity,
    Template {
        non_null: &'static str,
        /// Variant for nullable values. Falls back to `non_null`.
        nullable: Option<&'static str>,
    },
    /// The kind is known but this direction is deliberately not supported.
    Unsupported,
}

impl TableEntry {
    const fn template(pattern: &'static str) -> Self {
        TableEntry::Template {
            non_null: pattern,
            nullable: None,
        }
    }

    const fn optional(non_null: &'static str, nullable: &'static str) -> Self {
        TableEntry::Template {
            non_null,
            nullable: Some(nullable),
        }
    }

    /// Turn the entry into a concrete template for one type.
    ///
    /// `host_type_name` replaces the `{T}` token.
    pub fn specialize(
        self,
        kind: ValueKind,
        from: CodeLanguage,
        to: CodeLanguage,
        nullability: ResolvedNullability,
        host_type_name: &str,
    ) -> Result<Option<ConversionTemplate>, ConversionError> {
        match self {
            TableEntry::Identity => Ok(None),
            TableEntry::Unsupported => Err(ConversionError::Unsupported { kind, from, to }),
            TableEntry::Template { non_null, nullable } => {
                let pattern = match (nullability, nullable) {
                    (ResolvedNullability::Nullable, Some(nullable)) => nullable,
                    _ => non_null,
                };
                ConversionTemplate::new(pattern.replace(TYPE_TOKEN, host_type_name)).map(Some)
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    KotlinToJna,
    JnaToKotlin,
    SwiftToC,
    CToSwift,
}

/// The finite marshalling table.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConversionTemplateTable;

impl ConversionTemplateTable {
    /// Look up the entry for `kind` converted from `from` to `to`.
    pub fn lookup(
        kind: ValueKind,
        from: CodeLanguage,
        to: CodeLanguage,
    ) -> Result<TableEntry, ConversionError> {
        let Some(direction) = Self::direction(from, to)? else {
            return Ok(TableEntry::Identity);
        };

        Ok(match kind {
            ValueKind::Primitive(prim) => Self::primitive(prim, direction),
            ValueKind::Enum => match direction {
                Direction::KotlinToJna => TableEntry::template("{0}.value"),
                Direction::JnaToKotlin => TableEntry::template("{T}.fromValue({0})"),
                Direction::SwiftToC => TableEntry::template("{0}.cValue"),
                Direction::CToSwift => TableEntry::template("{T}(cValue: {0})"),
            },
            ValueKind::String => match direction {
                Direction::KotlinToJna => {
                    TableEntry::optional("{0}.toDotNETString()", "{0}?.toDotNETString()")
                }
                Direction::JnaToKotlin => {
                    TableEntry::optional("{0}.toKString()", "{0}?.toKString()")
                }
                Direction::SwiftToC => {
                    TableEntry::optional("{0}.dotNETString()", "{0}?.dotNETString()")
                }
                Direction::CToSwift => TableEntry::optional(
                    "String(dotNETString: {0})",
                    "{0}.map { String(dotNETString: $0) }",
                ),
            },
            ValueKind::ReferenceObject => match direction {
                Direction::KotlinToJna => TableEntry::optional("{0}.__handle", "{0}?.__handle"),
                Direction::JnaToKotlin => TableEntry::optional("{T}({0})", "{0}?.let { {T}(it) }"),
                Direction::SwiftToC => TableEntry::optional("{0}.__handle", "{0}?.__handle"),
                Direction::CToSwift => {
                    TableEntry::optional("{T}(handle: {0})", "{0}.map { {T}(handle: $0) }")
                }
            },
            ValueKind::OptionalWrapper => match direction {
                Direction::KotlinToJna | Direction::SwiftToC => {
                    TableEntry::template("DNNullable.box({0})")
                }
                Direction::JnaToKotlin => TableEntry::template("DNNullable.unbox<{T}>({0})"),
                Direction::CToSwift => TableEntry::template("DNNullable<{T}>.unbox({0})"),
            },
            ValueKind::ReadOnlyByteSpan => match direction {
                Direction::KotlinToJna => TableEntry::template("{0}.toDNReadOnlySpanOfByte()"),
                Direction::JnaToKotlin => TableEntry::template("{0}.toByteArray()"),
                Direction::SwiftToC => TableEntry::template("{0}.cDNReadOnlySpanOfByte"),
                Direction::CToSwift => TableEntry::template("{0}.data()"),
            },
            ValueKind::ByRef => match direction {
                Direction::KotlinToJna => TableEntry::template("{0}.__pointer"),
                Direction::JnaToKotlin => TableEntry::template("DNRef<{T}>({0})"),
                // `inout` cannot be rebound to a pointer temporary in Swift.
                Direction::SwiftToC | Direction::CToSwift => TableEntry::Unsupported,
            },
        })
    }

    fn direction(
        from: CodeLanguage,
        to: CodeLanguage,
    ) -> Result<Option<Direction>, ConversionError> {
        if from == to {
            return Ok(None);
        }
        match (from, to) {
            (CodeLanguage::Kotlin, CodeLanguage::KotlinJna) => Ok(Some(Direction::KotlinToJna)),
            (CodeLanguage::KotlinJna, CodeLanguage::Kotlin) => Ok(Some(Direction::JnaToKotlin)),
            (CodeLanguage::Swift, CodeLanguage::C) => Ok(Some(Direction::SwiftToC)),
            (CodeLanguage::C, CodeLanguage::Swift) => Ok(Some(Direction::CToSwift)),
            _ => Err(ConversionError::UnsupportedPair { from, to }),
        }
    }

    fn primitive(prim: PrimitiveKind, direction: Direction) -> TableEntry {
        match direction {
            // JNA has no unsigned types; reinterpret the bits.
            Direction::KotlinToJna => match prim {
                PrimitiveKind::Byte => TableEntry::template("{0}.toByte()"),
                PrimitiveKind::UInt16 => TableEntry::template("{0}.toShort()"),
                PrimitiveKind::UInt32 => TableEntry::template("{0}.toInt()"),
                PrimitiveKind::UInt64 | PrimitiveKind::UIntPtr => {
                    TableEntry::template("{0}.toLong()")
                }
                _ => TableEntry::Identity,
            },
            Direction::JnaToKotlin => match prim {
                PrimitiveKind::Byte => TableEntry::template("{0}.toUByte()"),
                PrimitiveKind::UInt16 => TableEntry::template("{0}.toUShort()"),
                PrimitiveKind::UInt32 => TableEntry::template("{0}.toUInt()"),
                PrimitiveKind::UInt64 | PrimitiveKind::UIntPtr => {
                    TableEntry::template("{0}.toULong()")
                }
                _ => TableEntry::Identity,
            },
            Direction::SwiftToC => match prim {
                PrimitiveKind::Char => TableEntry::template("{0}.cValue"),
                _ => TableEntry::Identity,
            },
            Direction::CToSwift => match prim {
                PrimitiveKind::Char => TableEntry::template("DNChar(cValue: {0})"),
                _ => TableEntry::Identity,
            },
        }
    }
}
