//! Per-type naming and conversion knowledge.
//!
//! A [`TypeDescriptor`] is built once per type identity by the
//! [`TypeDescriptorRegistry`](crate::TypeDescriptorRegistry) and never changes
//! afterwards. Everything it can answer is computed at build time:
//!
//! - the base name in each representation, with generic arguments, array
//!   elements and nullable inner types already substituted
//! - every conversion outcome for every (from, to, nullability) combination
//!
//! Lookups are therefore pure reads and repeated queries return identical
//! values.

use std::rc::Rc;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use tether_ir::{CodeLanguage, Nullability, ParamMode, ReflectedType, TypeKey, TypeKind};

use crate::naming::{c_identifier, primitive_name};
use crate::template::{ConversionTemplate, ConversionTemplateTable};
use crate::{
    ConversionError, DescriptorError, DescriptorKind, NullabilityResolver, ResolvedNullability,
    ValueKind,
};

bitflags! {
    /// Parameter passing modifiers that change how a name is rendered.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NameModifiers: u8 {
        const BY_REF = 1 << 0;
        const OUT = 1 << 1;
        const IN = 1 << 2;
    }
}

impl NameModifiers {
    pub const fn from_mode(mode: ParamMode) -> Self {
        match mode {
            ParamMode::ByValue => NameModifiers::empty(),
            ParamMode::Ref => NameModifiers::BY_REF,
            ParamMode::In => NameModifiers::IN,
            ParamMode::Out => NameModifiers::OUT,
        }
    }
}

/// Where a name is used.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Parameter,
    Return,
}

/// Everything [`TypeDescriptor::name`] needs to render one name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NameRequest {
    pub language: CodeLanguage,
    pub position: Position,
    /// Nullability of a value flowing in (by-value and `in` parameters).
    pub nullability_in: ResolvedNullability,
    /// Nullability of a value flowing out (returns, `ref`/`out` targets).
    pub nullability_out: ResolvedNullability,
    /// Ignored in return position.
    pub modifiers: NameModifiers,
}

impl NameRequest {
    pub const fn parameter(language: CodeLanguage, nullability: ResolvedNullability) -> Self {
        NameRequest {
            language,
            position: Position::Parameter,
            nullability_in: nullability,
            nullability_out: nullability,
            modifiers: NameModifiers::empty(),
        }
    }

    pub const fn return_value(language: CodeLanguage, nullability: ResolvedNullability) -> Self {
        NameRequest {
            language,
            position: Position::Return,
            nullability_in: nullability,
            nullability_out: nullability,
            modifiers: NameModifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: NameModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

type ConversionOutcome = Result<Option<ConversionTemplate>, ConversionError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct ConversionKey {
    from: CodeLanguage,
    to: CodeLanguage,
    nullability: ResolvedNullability,
}

/// Immutable per-type naming and conversion knowledge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    key: TypeKey,
    full_name: String,
    c_type_name: String,
    kind: DescriptorKind,
    default_nullability: Nullability,
    /// Indexed by [`language_slot`].
    base_names: [String; 4],
    conversions: FxHashMap<ConversionKey, ConversionOutcome>,
    by_ref_conversions: FxHashMap<(CodeLanguage, CodeLanguage), ConversionOutcome>,
}

const fn language_slot(language: CodeLanguage) -> usize {
    match language {
        CodeLanguage::C => 0,
        CodeLanguage::KotlinJna => 1,
        CodeLanguage::Kotlin => 2,
        CodeLanguage::Swift => 3,
    }
}

/// Host side of a pair, which supplies the `{T}` token.
const fn host_side(from: CodeLanguage, to: CodeLanguage) -> CodeLanguage {
    if from.is_host() {
        from
    } else {
        to
    }
}

impl TypeDescriptor {
    /// Build a descriptor.
    ///
    /// `dependencies` holds the already-built descriptors of the types `ty`
    /// refers to, in [`dependencies_of`] order.
    pub(crate) fn build(
        key: TypeKey,
        ty: &ReflectedType,
        dependencies: &[Rc<TypeDescriptor>],
        resolver: NullabilityResolver,
    ) -> Result<Self, DescriptorError> {
        let Some(declared_name) = ty.full_name.as_deref() else {
            return Err(DescriptorError::NoFullName {
                name: ty.name.clone(),
            });
        };

        let kind = DescriptorKind::classify(&ty.kind);
        let default_nullability = match kind {
            DescriptorKind::Void => Nullability::NonNullable,
            DescriptorKind::Value(ValueKind::OptionalWrapper) => Nullability::Nullable,
            DescriptorKind::Value(
                ValueKind::Primitive(_) | ValueKind::Enum | ValueKind::ReadOnlyByteSpan,
            ) => Nullability::NonNullable,
            _ => ty.nullability,
        };

        let (full_name, c_type_name) = match &ty.kind {
            TypeKind::GenericInstance { .. } => {
                let arg_full: Vec<&str> = dependencies.iter().map(|d| d.full_name()).collect();
                let arg_c: Vec<&str> = dependencies.iter().map(|d| d.c_type_name()).collect();
                (
                    format!("{declared_name}<{}>", arg_full.join(", ")),
                    format!("{}_{}", c_identifier(declared_name), arg_c.join("_")),
                )
            }
            _ => (declared_name.to_owned(), c_identifier(declared_name)),
        };

        let base_names = CodeLanguage::ALL.map(|language| {
            base_name(
                &ty.kind,
                kind,
                &c_type_name,
                declared_name,
                dependencies,
                language,
                resolver,
            )
        });

        let mut descriptor = TypeDescriptor {
            key,
            full_name,
            c_type_name,
            kind,
            default_nullability,
            base_names,
            conversions: FxHashMap::default(),
            by_ref_conversions: FxHashMap::default(),
        };
        descriptor.precompute_conversions();
        Ok(descriptor)
    }

    fn precompute_conversions(&mut self) {
        for from in CodeLanguage::ALL {
            for to in CodeLanguage::ALL {
                for nullability in ResolvedNullability::ALL {
                    let outcome = self.compute_conversion(from, to, nullability);
                    self.conversions.insert(
                        ConversionKey {
                            from,
                            to,
                            nullability,
                        },
                        outcome,
                    );
                }
                let by_ref = self.compute_by_ref_conversion(from, to);
                self.by_ref_conversions.insert((from, to), by_ref);
            }
        }
    }

    fn compute_conversion(
        &self,
        from: CodeLanguage,
        to: CodeLanguage,
        nullability: ResolvedNullability,
    ) -> ConversionOutcome {
        let kind = match self.kind {
            DescriptorKind::Value(kind) => kind,
            DescriptorKind::Void => {
                return Err(ConversionError::UnrecognizedKind {
                    type_name: self.full_name.clone(),
                    what: "void has no value",
                })
            }
            DescriptorKind::Unrecognized(what) => {
                return Err(ConversionError::UnrecognizedKind {
                    type_name: self.full_name.clone(),
                    what,
                })
            }
        };

        let host_name = self.base_name(host_side(from, to));
        ConversionTemplateTable::lookup(kind, from, to)?
            .specialize(kind, from, to, nullability, host_name)
    }

    fn compute_by_ref_conversion(&self, from: CodeLanguage, to: CodeLanguage) -> ConversionOutcome {
        if let DescriptorKind::Unrecognized(what) = self.kind {
            return Err(ConversionError::UnrecognizedKind {
                type_name: self.full_name.clone(),
                what,
            });
        }

        let host_name = self.base_name(host_side(from, to));
        ConversionTemplateTable::lookup(ValueKind::ByRef, from, to)?.specialize(
            ValueKind::ByRef,
            from,
            to,
            ResolvedNullability::NonNullable,
            host_name,
        )
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Canonical managed name, generic arguments included.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Sanitized identifier used for C symbols and host wrapper classes.
    pub fn c_type_name(&self) -> &str {
        &self.c_type_name
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    /// Nullability the type carries when a member does not annotate it.
    pub fn default_nullability(&self) -> Nullability {
        self.default_nullability
    }

    pub fn is_void(&self) -> bool {
        self.kind.is_void()
    }

    /// Name in `language` without nullability markers or modifiers.
    pub fn base_name(&self, language: CodeLanguage) -> &str {
        &self.base_names[language_slot(language)]
    }

    /// Render a name for the given request.
    pub fn name(&self, request: &NameRequest) -> String {
        let language = request.language;

        if request.position == Position::Return || request.modifiers.is_empty() {
            let nullability = match request.position {
                Position::Return => request.nullability_out,
                Position::Parameter => request.nullability_in,
            };
            return self.with_nullability(language, nullability);
        }

        let inner_nullability = if request
            .modifiers
            .intersects(NameModifiers::BY_REF | NameModifiers::OUT)
        {
            request.nullability_out
        } else {
            request.nullability_in
        };
        let inner = self.with_nullability(language, inner_nullability);

        match language {
            CodeLanguage::C => format!("{inner}*"),
            CodeLanguage::KotlinJna => "Pointer".to_owned(),
            CodeLanguage::Kotlin => format!("DNRef<{inner}>"),
            CodeLanguage::Swift => format!("inout {inner}"),
        }
    }

    fn with_nullability(&self, language: CodeLanguage, nullability: ResolvedNullability) -> String {
        let base = self.base_name(language);
        let Some(kind) = self.kind.value_kind() else {
            return base.to_owned();
        };
        if !kind.is_reference_like() {
            return base.to_owned();
        }

        match language {
            CodeLanguage::C => {
                if nullability.is_nullable() {
                    format!("{base} _Nullable")
                } else {
                    format!("{base} _Nonnull")
                }
            }
            CodeLanguage::Kotlin | CodeLanguage::Swift
                if nullability.is_nullable() || kind == ValueKind::OptionalWrapper =>
            {
                format!("{base}?")
            }
            CodeLanguage::KotlinJna if nullability.is_nullable() => format!("{base}?"),
            _ => base.to_owned(),
        }
    }

    /// Conversion of a value of this type from `from` to `to`.
    ///
    /// `Ok(None)` means the expression is usable unchanged.
    pub fn convert(
        &self,
        from: CodeLanguage,
        to: CodeLanguage,
        nullability: ResolvedNullability,
    ) -> Result<Option<ConversionTemplate>, ConversionError> {
        let key = ConversionKey {
            from,
            to,
            nullability,
        };
        match self.conversions.get(&key) {
            Some(outcome) => outcome.clone(),
            None => Err(ConversionError::UnsupportedPair { from, to }),
        }
    }

    /// Conversion of a reference to a storage location of this type.
    pub fn convert_by_ref(
        &self,
        from: CodeLanguage,
        to: CodeLanguage,
    ) -> Result<Option<ConversionTemplate>, ConversionError> {
        match self.by_ref_conversions.get(&(from, to)) {
            Some(outcome) => outcome.clone(),
            None => Err(ConversionError::UnsupportedPair { from, to }),
        }
    }
}

/// Types a descriptor must be built after, in the order `build` expects them.
pub(crate) fn dependencies_of(kind: &TypeKind) -> Vec<TypeKey> {
    match kind {
        TypeKind::Array { element } => vec![*element],
        TypeKind::GenericInstance { args } => args.clone(),
        TypeKind::Nullable { inner } => vec![*inner],
        _ => Vec::new(),
    }
}

/// Name of a dependency when it appears inside another type's name.
fn nested_name(
    dependency: &TypeDescriptor,
    language: CodeLanguage,
    resolver: NullabilityResolver,
) -> String {
    let nullability = resolver.concretize(dependency.default_nullability());
    dependency.name(&NameRequest::parameter(language, nullability))
}

fn base_name(
    type_kind: &TypeKind,
    kind: DescriptorKind,
    c_type_name: &str,
    declared_name: &str,
    dependencies: &[Rc<TypeDescriptor>],
    language: CodeLanguage,
    resolver: NullabilityResolver,
) -> String {
    let value_kind = match kind {
        DescriptorKind::Void => {
            return match language {
                CodeLanguage::C => "void",
                CodeLanguage::KotlinJna | CodeLanguage::Kotlin => "Unit",
                CodeLanguage::Swift => "Void",
            }
            .to_owned();
        }
        DescriptorKind::Unrecognized(_) => {
            return match language {
                CodeLanguage::C => "void*",
                CodeLanguage::KotlinJna | CodeLanguage::Kotlin => "Pointer",
                CodeLanguage::Swift => "OpaquePointer",
            }
            .to_owned();
        }
        DescriptorKind::Value(value_kind) => value_kind,
    };

    match value_kind {
        ValueKind::Primitive(prim) => primitive_name(prim, language).to_owned(),
        ValueKind::Enum => match (language, type_kind) {
            (CodeLanguage::KotlinJna, TypeKind::Enum { underlying }) => {
                primitive_name(*underlying, language).to_owned()
            }
            _ => c_type_name.to_owned(),
        },
        ValueKind::String => match language {
            CodeLanguage::C => "System_String_t".to_owned(),
            CodeLanguage::KotlinJna => "Pointer".to_owned(),
            CodeLanguage::Kotlin | CodeLanguage::Swift => "String".to_owned(),
        },
        ValueKind::OptionalWrapper => match language {
            CodeLanguage::C => "System_Object_t".to_owned(),
            CodeLanguage::KotlinJna => "Pointer".to_owned(),
            CodeLanguage::Kotlin | CodeLanguage::Swift => dependencies.first().map_or_else(
                || c_type_name.to_owned(),
                |inner| inner.base_name(language).to_owned(),
            ),
        },
        ValueKind::ReadOnlyByteSpan => match language {
            CodeLanguage::C => "DNReadOnlySpanOfByte".to_owned(),
            CodeLanguage::KotlinJna => "DNReadOnlySpanOfByte.ByValue".to_owned(),
            CodeLanguage::Kotlin => "ByteArray".to_owned(),
            CodeLanguage::Swift => "Data".to_owned(),
        },
        ValueKind::ReferenceObject | ValueKind::ByRef => match language {
            CodeLanguage::C => format!("{c_type_name}_t"),
            CodeLanguage::KotlinJna => "Pointer".to_owned(),
            CodeLanguage::Kotlin | CodeLanguage::Swift => match type_kind {
                TypeKind::Array { .. } => {
                    let element = dependencies
                        .first()
                        .map_or_else(String::new, |e| nested_name(e, language, resolver));
                    format!("DNArray<{element}>")
                }
                TypeKind::GenericInstance { .. } => {
                    let args: Vec<String> = dependencies
                        .iter()
                        .map(|arg| nested_name(arg, language, resolver))
                        .collect();
                    format!("{}<{}>", c_identifier(declared_name), args.join(", "))
                }
                _ => c_type_name.to_owned(),
            },
        },
    }
}
