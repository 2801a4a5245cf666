//! In-memory type arena.
//!
//! `TypeUniverse` owns every reflected type of a run and hands out stable
//! [`TypeKey`]s. Builtin runtime types are registered at construction at their
//! fixed keys, so primitive lookups need no name resolution.
//!
//! Generators never talk to `TypeUniverse` directly; they go through the
//! [`ReflectionSource`] trait so an embedder can plug in its own reflection
//! backend.

use rustc_hash::FxHashMap;

use crate::{Nullability, PrimitiveKind, ReflectedType, TypeKey, TypeKind};

/// Read access to reflected types.
pub trait ReflectionSource {
    /// Look up a type by key. `None` for keys this source never issued.
    fn reflected(&self, key: TypeKey) -> Option<&ReflectedType>;

    /// Every registered key, in registration order.
    fn keys(&self) -> Vec<TypeKey>;
}

/// Arena of reflected types.
#[derive(Clone, Debug)]
pub struct TypeUniverse {
    /// Indexed by `TypeKey::raw()`. Reserved slots between the builtins and
    /// `FIRST_DYNAMIC` stay `None`.
    types: Vec<Option<ReflectedType>>,
    by_full_name: FxHashMap<String, TypeKey>,
}

impl TypeUniverse {
    /// Create a universe holding only the builtin runtime types.
    pub fn new() -> Self {
        let mut universe = TypeUniverse {
            types: Vec::with_capacity(TypeKey::FIRST_DYNAMIC as usize + 16),
            by_full_name: FxHashMap::default(),
        };
        universe.register_builtins();
        universe
    }

    fn register_builtins(&mut self) {
        self.put_builtin(
            TypeKey::VOID,
            ReflectedType::new("Void", Some("System.Void".to_owned()), TypeKind::Void),
        );

        for prim in PrimitiveKind::ALL {
            let name = prim.runtime_name();
            let ty = ReflectedType::new(
                name,
                Some(format!("System.{name}")),
                TypeKind::Primitive(prim),
            )
            .with_nullability(Nullability::NonNullable);
            self.put_builtin(prim.key(), ty);
        }

        self.put_builtin(
            TypeKey::STRING,
            ReflectedType::new("String", Some("System.String".to_owned()), TypeKind::String)
                .with_base(TypeKey::OBJECT),
        );
        self.put_builtin(
            TypeKey::OBJECT,
            ReflectedType::new("Object", Some("System.Object".to_owned()), TypeKind::Class),
        );
        self.put_builtin(TypeKey::DELEGATE, ReflectedType::class("System.Delegate"));
        self.put_builtin(
            TypeKey::MULTICAST_DELEGATE,
            ReflectedType::class("System.MulticastDelegate").with_base(TypeKey::DELEGATE),
        );
        self.put_builtin(
            TypeKey::READ_ONLY_SPAN_OF_BYTE,
            ReflectedType::new(
                "ReadOnlySpan`1",
                Some("System.ReadOnlySpan<System.Byte>".to_owned()),
                TypeKind::ReadOnlySpanOfByte,
            )
            .with_nullability(Nullability::NonNullable),
        );

        self.types.resize(TypeKey::FIRST_DYNAMIC as usize, None);
    }

    fn put_builtin(&mut self, key: TypeKey, ty: ReflectedType) {
        let index = key.raw() as usize;
        if self.types.len() <= index {
            self.types.resize(index + 1, None);
        }
        if let Some(full_name) = &ty.full_name {
            self.by_full_name.insert(full_name.clone(), key);
        }
        self.types[index] = Some(ty);
    }

    /// Register a type and return its key.
    ///
    /// Registering a second type under an existing full name returns the
    /// existing key and keeps the first registration.
    pub fn register(&mut self, ty: ReflectedType) -> TypeKey {
        if let Some(existing) = ty
            .full_name
            .as_ref()
            .and_then(|name| self.by_full_name.get(name))
        {
            return *existing;
        }

        let full_name = ty.full_name.clone();
        let key = self.push(ty);
        if let Some(full_name) = full_name {
            self.by_full_name.insert(full_name, key);
        }
        key
    }

    fn push(&mut self, ty: ReflectedType) -> TypeKey {
        let key = key_at(self.types.len());
        self.types.push(Some(ty));
        key
    }

    /// Register an array of `element`.
    pub fn array_of(&mut self, element: TypeKey) -> TypeKey {
        let element_name = self.full_name_of(element);
        let short = self
            .get(element)
            .map_or_else(|| "Array".to_owned(), |ty| format!("{}[]", ty.name));
        self.register(ReflectedType::new(
            short,
            element_name.map(|name| format!("{name}[]")),
            TypeKind::Array { element },
        ))
    }

    /// Register `System.Nullable<inner>`.
    pub fn nullable_of(&mut self, inner: TypeKey) -> TypeKey {
        let inner_name = self.full_name_of(inner);
        let ty = ReflectedType::new(
            "Nullable`1",
            inner_name.map(|name| format!("System.Nullable<{name}>")),
            TypeKind::Nullable { inner },
        )
        .with_nullability(Nullability::Nullable);
        self.register(ty)
    }

    /// Register a constructed generic type.
    ///
    /// `definition_full_name` is the open definition name including arity
    /// (``System.Collections.Generic.List`1``).
    pub fn generic_instance(&mut self, definition_full_name: &str, args: Vec<TypeKey>) -> TypeKey {
        let arg_names: Option<Vec<String>> =
            args.iter().map(|arg| self.full_name_of(*arg)).collect();
        let short = definition_full_name
            .rsplit('.')
            .next()
            .unwrap_or(definition_full_name);
        let ty = ReflectedType::new(
            short,
            Some(definition_full_name.to_owned()),
            TypeKind::GenericInstance { args },
        )
        .with_base(TypeKey::OBJECT);

        // Constructed names are unique per argument list; index by that name
        // so the same instantiation maps to one key.
        let Some(arg_names) = arg_names else {
            return self.push(ty);
        };
        let constructed = format!("{definition_full_name}[{}]", arg_names.join(","));
        if let Some(existing) = self.by_full_name.get(&constructed) {
            return *existing;
        }
        let key = self.push(ty);
        self.by_full_name.insert(constructed, key);
        key
    }

    pub fn get(&self, key: TypeKey) -> Option<&ReflectedType> {
        self.types.get(key.raw() as usize).and_then(Option::as_ref)
    }

    pub fn find(&self, full_name: &str) -> Option<TypeKey> {
        self.by_full_name.get(full_name).copied()
    }

    /// Number of registered types, builtins included.
    pub fn len(&self) -> usize {
        self.types.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn full_name_of(&self, key: TypeKey) -> Option<String> {
        self.get(key).and_then(|ty| ty.full_name.clone())
    }
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflectionSource for TypeUniverse {
    fn reflected(&self, key: TypeKey) -> Option<&ReflectedType> {
        self.get(key)
    }

    fn keys(&self) -> Vec<TypeKey> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| key_at(index))
            .collect()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "arena size is bounded far below u32::MAX"
)]
fn key_at(index: usize) -> TypeKey {
    TypeKey::from_raw(index as u32)
}
