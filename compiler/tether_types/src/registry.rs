//! Memoizing descriptor arena.
//!
//! `TypeDescriptorRegistry` owns every [`TypeDescriptor`] of a run. Descriptors
//! are created on first request and shared as `Rc` afterwards, so one type
//! identity maps to exactly one descriptor.
//!
//! # Design
//!
//! Same shape as a lazily-populated type info cache:
//! - `RefCell` storage, single-threaded, no locking
//! - dependencies (generic arguments, array elements, nullable inner types)
//!   are described first, recursively
//! - a `computing` set guards against self-referential shapes; a cycle is
//!   reported as an error instead of overflowing the stack
//!
//! The registry is an explicit context object. Independent runs create
//! independent registries.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tether_ir::{ReflectionSource, TypeKey};

use crate::descriptor::dependencies_of;
use crate::{DescriptorError, NullabilityResolver, TypeDescriptor};

/// Arena of type descriptors keyed by type identity.
pub struct TypeDescriptorRegistry<'r> {
    source: &'r dyn ReflectionSource,
    resolver: NullabilityResolver,
    descriptors: RefCell<FxHashMap<TypeKey, Rc<TypeDescriptor>>>,
    /// Keys currently being described, for cycle detection.
    computing: RefCell<FxHashSet<TypeKey>>,
}

impl<'r> TypeDescriptorRegistry<'r> {
    pub fn new(source: &'r dyn ReflectionSource, resolver: NullabilityResolver) -> Self {
        TypeDescriptorRegistry {
            source,
            resolver,
            descriptors: RefCell::new(FxHashMap::default()),
            computing: RefCell::new(FxHashSet::default()),
        }
    }

    pub fn source(&self) -> &'r dyn ReflectionSource {
        self.source
    }

    pub fn resolver(&self) -> NullabilityResolver {
        self.resolver
    }

    /// Return the descriptor for `key`, creating it on first use.
    ///
    /// Fails when the type (or anything its name depends on) has no full
    /// name. Failures are not cached; asking again yields the same error.
    pub fn get_or_create(&self, key: TypeKey) -> Result<Rc<TypeDescriptor>, DescriptorError> {
        if let Some(existing) = self.descriptors.borrow().get(&key) {
            return Ok(Rc::clone(existing));
        }

        let Some(ty) = self.source.reflected(key) else {
            return Err(DescriptorError::UnknownType { key });
        };

        if !self.computing.borrow_mut().insert(key) {
            tracing::warn!(
                type_name = ty.full_name_or_name(),
                "cycle detected while describing type"
            );
            return Err(DescriptorError::Cycle {
                full_name: ty.full_name_or_name().to_owned(),
            });
        }

        let built = self.build(key);
        self.computing.borrow_mut().remove(&key);

        let descriptor = Rc::new(built?);
        tracing::trace!(
            full_name = descriptor.full_name(),
            c_type_name = descriptor.c_type_name(),
            "described type"
        );
        self.descriptors
            .borrow_mut()
            .insert(key, Rc::clone(&descriptor));
        Ok(descriptor)
    }

    fn build(&self, key: TypeKey) -> Result<TypeDescriptor, DescriptorError> {
        let Some(ty) = self.source.reflected(key) else {
            return Err(DescriptorError::UnknownType { key });
        };

        // Fail on the type itself before descending into its dependencies.
        if ty.full_name.is_none() {
            return Err(DescriptorError::NoFullName {
                name: ty.name.clone(),
            });
        }

        let dependencies = dependencies_of(&ty.kind)
            .into_iter()
            .map(|dep| self.get_or_create(dep))
            .collect::<Result<Vec<_>, _>>()?;

        TypeDescriptor::build(key, ty, &dependencies, self.resolver)
    }

    /// Descriptor for `key` if it was already created.
    pub fn get(&self, key: TypeKey) -> Option<Rc<TypeDescriptor>> {
        self.descriptors.borrow().get(&key).cloned()
    }

    /// Number of descriptors created so far.
    pub fn len(&self) -> usize {
        self.descriptors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.borrow().is_empty()
    }
}
