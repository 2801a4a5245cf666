//! Results of the native-layer pass.
//!
//! The C declarations a delegate wrapper calls into are produced by a
//! separate native-layer generator that runs first. This module only models
//! what that pass hands over: the names of the function-pointer types and the
//! invoke entry point for each type. A delegate is never generated without
//! them.

use rustc_hash::FxHashMap;
use tether_ir::{ReflectionSource, TypeKey};
use tether_types::naming::c_identifier;

/// Native declarations for one delegate type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NativeLayerArtifacts {
    pub c_type_name: String,
    /// `<C>_CFunction_t`: callback taking the context pointer first.
    pub function_type: String,
    /// `<C>_CDestructorFunction_t`: releases the context pointer.
    pub destructor_function_type: String,
    /// `<C>_Invoke(self, ..., exception_out)`.
    pub invoke_function: String,
}

impl NativeLayerArtifacts {
    /// Artifacts following the fixed native naming convention.
    pub fn conventional(c_type_name: &str) -> Self {
        NativeLayerArtifacts {
            c_type_name: c_type_name.to_owned(),
            function_type: format!("{c_type_name}_CFunction_t"),
            destructor_function_type: format!("{c_type_name}_CDestructorFunction_t"),
            invoke_function: format!("{c_type_name}_Invoke"),
        }
    }
}

/// State earlier pipeline stages leave behind for this one.
#[derive(Clone, Debug, Default)]
pub struct UpstreamState {
    native_layer: FxHashMap<TypeKey, NativeLayerArtifacts>,
}

impl UpstreamState {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the native-layer pass produces for `keys` under the naming
    /// convention. Types without a full name get nothing, as upstream would
    /// have skipped them too.
    pub fn conventional(source: &dyn ReflectionSource, keys: &[TypeKey]) -> Self {
        let mut state = Self::new();
        for &key in keys {
            let Some(full_name) = source.reflected(key).and_then(|ty| ty.full_name.as_deref())
            else {
                continue;
            };
            state.record(key, NativeLayerArtifacts::conventional(&c_identifier(full_name)));
        }
        state
    }

    pub fn record(&mut self, key: TypeKey, artifacts: NativeLayerArtifacts) {
        self.native_layer.insert(key, artifacts);
    }

    pub fn native_layer(&self, key: TypeKey) -> Option<&NativeLayerArtifacts> {
        self.native_layer.get(&key)
    }

    pub fn len(&self) -> usize {
        self.native_layer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.native_layer.is_empty()
    }
}
