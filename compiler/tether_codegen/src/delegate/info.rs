//! Delegate signature resolution.
//!
//! `DelegateTypeInfo` is everything the emitters need about one delegate
//! type, resolved once per host: descriptors for the return type and every
//! parameter, concrete nullability, and the base delegate's signature for
//! override detection. All rejections happen here, before any text is
//! produced.

use std::rc::Rc;

use smallvec::SmallVec;
use tether_ir::{
    CodeLanguage, HostLanguage, InvokeSignature, ParamMode, ReflectedType, ReflectionSource,
    TypeKey, TypeKind,
};
use tether_types::{
    DescriptorError, NameRequest, ResolvedNullability, TypeDescriptor, TypeDescriptorRegistry,
};

use crate::marshal::{self, MarshalledParam};
use crate::syntax::HostDialect;
use crate::{GenerationProblem, GeneratorConfig};

/// Resolved view of one delegate type for one host.
#[derive(Clone, Debug)]
pub struct DelegateTypeInfo {
    pub key: TypeKey,
    pub host: HostLanguage,
    pub descriptor: Rc<TypeDescriptor>,
    /// Short managed name, e.g. `Callback`.
    pub type_name: String,
    pub full_type_name: String,
    /// Wrapper class name on the host side.
    pub host_type_name: String,
    /// Wrapper class name of the base type on the host side.
    pub host_base_type_name: String,
    pub return_descriptor: Rc<TypeDescriptor>,
    pub return_nullability: ResolvedNullability,
    pub params: SmallVec<[MarshalledParam; 4]>,
    pub signature: InvokeSignature,
    /// Invoke signature of the base type, when the base is itself a
    /// delegate that resolves for this host.
    pub base_signature: Option<InvokeSignature>,
}

/// The reflected delegate behind `key` and its full name.
///
/// These checks decide whether `key` names a bindable delegate at all, and
/// run before anything else is looked at.
pub(crate) fn reflected_delegate(
    key: TypeKey,
    source: &dyn ReflectionSource,
) -> Result<(&ReflectedType, &str), GenerationProblem> {
    let Some(ty) = source.reflected(key) else {
        return Err(DescriptorError::UnknownType { key }.into());
    };
    let Some(full_name) = ty.full_name.as_deref() else {
        return Err(GenerationProblem::NoFullName);
    };
    if !matches!(ty.kind, TypeKind::Delegate) {
        return Err(GenerationProblem::NotADelegate);
    }
    Ok((ty, full_name))
}

impl DelegateTypeInfo {
    /// Resolve `key` for `config.host`.
    pub fn resolve(
        key: TypeKey,
        registry: &TypeDescriptorRegistry<'_>,
        config: &GeneratorConfig,
    ) -> Result<Self, GenerationProblem> {
        let resolver = registry.resolver();
        let host = config.host;

        let (ty, _) = reflected_delegate(key, registry.source())?;
        let Some(signature) = ty.invoke.clone() else {
            return Err(GenerationProblem::MissingInvoke { host });
        };

        if signature.returns_by_ref {
            return Err(GenerationProblem::ByRefReturn { host });
        }
        for param in &signature.params {
            match param.mode {
                ParamMode::ByValue => {}
                ParamMode::Ref if config.allows_by_ref_parameters() => {}
                mode => return Err(GenerationProblem::UnsupportedParameter { host, mode }),
            }
        }

        let descriptor = registry.get_or_create(key)?;

        let return_descriptor = registry.get_or_create(signature.return_type)?;
        let return_nullability = resolver.resolve_for_emission(
            signature.return_nullability,
            return_descriptor.default_nullability(),
        );

        let mut params = SmallVec::with_capacity(signature.params.len());
        for param in &signature.params {
            let param_descriptor = registry.get_or_create(param.ty)?;
            let nullability = resolver
                .resolve_for_emission(param.nullability, param_descriptor.default_nullability());
            params.push(MarshalledParam {
                name: param.name.clone(),
                descriptor: param_descriptor,
                mode: param.mode,
                nullability,
            });
        }

        let (host_base_type_name, base_signature) = match ty.base {
            Some(base) => {
                let base_descriptor = registry.get_or_create(base)?;
                // A skipped base has no `invoke` to override.
                let base_signature = Self::resolve(base, registry, config)
                    .ok()
                    .map(|base_info| base_info.signature);
                (
                    base_descriptor.base_name(host.language()).to_owned(),
                    base_signature,
                )
            }
            None => ("DNObject".to_owned(), None),
        };

        let info = DelegateTypeInfo {
            key,
            host,
            host_type_name: descriptor.base_name(host.language()).to_owned(),
            type_name: ty.name.clone(),
            full_type_name: descriptor.full_name().to_owned(),
            descriptor,
            host_base_type_name,
            return_descriptor,
            return_nullability,
            params,
            signature,
            base_signature,
        };

        // Every crossing must have a conversion path, both ways.
        info.check_conversions()?;
        Ok(info)
    }

    fn check_conversions(&self) -> Result<(), GenerationProblem> {
        let host = self.host.language();
        let native = self.host.native_call_language();

        for param in &self.params {
            param.conversion(native, host)?;
            param.conversion(host, native)?;
        }
        if self.is_returning() {
            self.return_descriptor
                .convert(host, native, self.return_nullability)?;
            self.return_descriptor
                .convert(native, host, self.return_nullability)?;
        }
        Ok(())
    }

    pub fn is_returning(&self) -> bool {
        !self.return_descriptor.is_void()
    }

    /// Whether the invoke adapter overrides the base delegate's.
    pub fn is_override(&self) -> bool {
        self.base_signature
            .as_ref()
            .is_some_and(|base| base.matches(&self.signature))
    }

    pub fn return_type_name(&self, language: CodeLanguage) -> String {
        self.return_descriptor
            .name(&NameRequest::return_value(language, self.return_nullability))
    }

    /// Host function type of the boxed closure.
    pub fn closure_type(&self, dialect: &dyn HostDialect) -> String {
        let host = self.host.language();
        let params = marshal::type_names(&self.params, host);
        dialect.closure_type(&params, &self.return_type_name(host))
    }
}
