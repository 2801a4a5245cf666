//! Delegate binding generation.
//!
//! A managed delegate type becomes a host class wrapping a native handle,
//! with four groups of members:
//!
//! - type identity (`typeName`, `fullTypeName`)
//! - a factory turning a host closure into a native function pointer
//!   (`__createCFunction`)
//! - the paired factory releasing that closure (`__createCDestructorFunction`)
//! - an `invoke` adapter calling the delegate from the host side
//!
//! # Design
//!
//! Generation is two-phase. [`DelegateTypeInfo::resolve`] does all the
//! checking and produces a resolved view; the emitters in `callable` and
//! `invoke` only format text from it and cannot reject a type.
//!
//! The native layer for the same type is a hard precondition. Once `key` is
//! known to name a delegate, a missing native-layer result aborts the type
//! before its signature is examined, so an unsupported signature never
//! masks it. A result for a different C type aborts it after resolution.

mod callable;
mod info;
mod invoke;

pub use info::DelegateTypeInfo;

use tether_ir::TypeKey;
use tether_types::TypeDescriptorRegistry;

use crate::native::{NativeLayerArtifacts, UpstreamState};
use crate::syntax::{dialect_for, ClassDecl, HostDialect, PropertyDecl, Visibility};
use crate::{GenerationProblem, GeneratorConfig};

/// Name of the context parameter of every native callback.
pub(crate) const CONTEXT_PARAM: &str = "__innerContext";

/// One generated factory member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallableFactory {
    pub name: String,
    /// Native function-pointer type the factory returns.
    pub return_type: String,
    pub text: String,
}

/// The generated `invoke` member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeAdapter {
    pub is_override: bool,
    pub native_function: String,
    /// Arguments of the native call, in order: self handle, converted
    /// parameters, exception slot.
    pub native_args: Vec<String>,
    pub is_returning: bool,
    pub text: String,
}

/// Bindings for one delegate type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegateBinding {
    pub key: TypeKey,
    pub full_type_name: String,
    pub host_type_name: String,
    pub type_identity: String,
    pub create_callable: CallableFactory,
    pub create_destructor: CallableFactory,
    pub invoke: InvokeAdapter,
    /// The whole class declaration.
    pub text: String,
}

/// Generates delegate bindings for one host.
pub struct DelegateBindingGenerator<'a, 'r> {
    registry: &'a TypeDescriptorRegistry<'r>,
    config: &'a GeneratorConfig,
    dialect: &'static dyn HostDialect,
}

impl<'a, 'r> DelegateBindingGenerator<'a, 'r> {
    pub fn new(registry: &'a TypeDescriptorRegistry<'r>, config: &'a GeneratorConfig) -> Self {
        DelegateBindingGenerator {
            registry,
            config,
            dialect: dialect_for(config.host),
        }
    }

    pub fn dialect(&self) -> &'static dyn HostDialect {
        self.dialect
    }

    /// Generate bindings for the delegate type `key`.
    pub fn generate(
        &self,
        key: TypeKey,
        upstream: &UpstreamState,
    ) -> Result<DelegateBinding, GenerationProblem> {
        let (_, full_name) = info::reflected_delegate(key, self.registry.source())?;
        let Some(native) = upstream.native_layer(key) else {
            return Err(GenerationProblem::MissingNativeLayer {
                type_name: full_name.to_owned(),
            });
        };
        let info = DelegateTypeInfo::resolve(key, self.registry, self.config)?;
        Self::check_native_layer(&info, native)?;

        let type_identity = self.type_identity(&info);
        let create_callable = callable::create_callable(&info, native, self.dialect)?;
        let create_destructor = callable::create_destructor(&info, native, self.dialect);
        let invoke = invoke::invoke_adapter(&info, native, self.dialect)?;

        let (constructor_params, base_constructor_args) = self.dialect.handle_constructor();
        let class = ClassDecl {
            name: info.host_type_name.clone(),
            comment: Some(info.full_type_name.clone()),
            visibility: Visibility::Open,
            base_type: Some(info.host_base_type_name.clone()),
            interfaces: Vec::new(),
            constructor_params,
            base_constructor_args,
            members: vec![
                type_identity.clone(),
                create_callable.text.clone(),
                create_destructor.text.clone(),
                invoke.text.clone(),
            ],
        };
        let text = self.dialect.render_class(&class);

        tracing::debug!(
            type_name = %info.full_type_name,
            host = %info.host,
            params = info.params.len(),
            is_override = invoke.is_override,
            "generated delegate binding"
        );

        Ok(DelegateBinding {
            key,
            full_type_name: info.full_type_name,
            host_type_name: info.host_type_name,
            type_identity,
            create_callable,
            create_destructor,
            invoke,
            text,
        })
    }

    /// The native layer's result must describe this very type.
    fn check_native_layer(
        info: &DelegateTypeInfo,
        native: &NativeLayerArtifacts,
    ) -> Result<(), GenerationProblem> {
        let expected = info.descriptor.c_type_name();
        if native.c_type_name != expected {
            return Err(GenerationProblem::NativeLayerMismatch {
                type_name: info.full_type_name.clone(),
                expected: expected.to_owned(),
                found: native.c_type_name.clone(),
            });
        }
        Ok(())
    }

    fn type_identity(&self, info: &DelegateTypeInfo) -> String {
        let property = |name: &str, value: &str| PropertyDecl {
            name: name.to_owned(),
            type_name: "String".to_owned(),
            is_override: true,
            is_static: true,
            getter: format!("\"{value}\""),
            ..PropertyDecl::default()
        };
        self.dialect.render_properties(&[
            property("typeName", &info.type_name),
            property("fullTypeName", &info.full_type_name),
        ])
    }
}

#[cfg(test)]
mod tests;
