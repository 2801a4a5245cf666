//! Parameter marshalling shared by every boundary crossing.
//!
//! Callback entry (native to host) and forward calls (host to native) both
//! go through [`convert_params`], so both directions read the same conversion
//! templates from the descriptors. An identity conversion produces no
//! statement; the source expression is used as the argument directly.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use tether_ir::{CodeLanguage, ParamMode};
use tether_types::naming::escape_identifier;
use tether_types::{
    ConversionError, ConversionTemplate, NameModifiers, NameRequest, ResolvedNullability,
    TypeDescriptor,
};

use crate::syntax::{BindingDecl, HostDialect};

/// A parameter with everything needed to name and convert it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarshalledParam {
    /// Name as declared on the managed side.
    pub name: String,
    pub descriptor: Rc<TypeDescriptor>,
    pub mode: ParamMode,
    pub nullability: ResolvedNullability,
}

impl MarshalledParam {
    /// The name as a valid identifier in `language`.
    pub fn identifier(&self, language: CodeLanguage) -> String {
        escape_identifier(&self.name, language)
    }

    pub fn type_name(&self, language: CodeLanguage) -> String {
        let request = NameRequest::parameter(language, self.nullability)
            .with_modifiers(NameModifiers::from_mode(self.mode));
        self.descriptor.name(&request)
    }

    /// Conversion template from `from` to `to`, by-ref aware.
    pub fn conversion(
        &self,
        from: CodeLanguage,
        to: CodeLanguage,
    ) -> Result<Option<ConversionTemplate>, ConversionError> {
        if self.mode.is_by_value() {
            self.descriptor.convert(from, to, self.nullability)
        } else {
            self.descriptor.convert_by_ref(from, to)
        }
    }
}

/// Suffix for temporaries holding a value in `language`.
pub fn temp_suffix(language: CodeLanguage) -> &'static str {
    match language {
        CodeLanguage::C | CodeLanguage::KotlinJna => "C",
        CodeLanguage::Kotlin => "Kotlin",
        CodeLanguage::Swift => "Swift",
    }
}

/// `name: Type` declarations in `language`.
pub fn declarations(
    params: &[MarshalledParam],
    dialect: &dyn HostDialect,
    language: CodeLanguage,
) -> Vec<String> {
    params
        .iter()
        .map(|p| dialect.parameter(&p.identifier(language), &p.type_name(language)))
        .collect()
}

pub fn type_names(params: &[MarshalledParam], language: CodeLanguage) -> Vec<String> {
    params.iter().map(|p| p.type_name(language)).collect()
}

pub fn identifiers(params: &[MarshalledParam], language: CodeLanguage) -> Vec<String> {
    params.iter().map(|p| p.identifier(language)).collect()
}

/// Conversion statements and the resulting argument expressions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertedParams {
    /// One binding per non-identity conversion, in parameter order.
    pub statements: Vec<String>,
    /// Argument expressions, in parameter order.
    pub arguments: Vec<String>,
}

/// Convert every parameter from `from` to `to`.
///
/// Parameters are referred to by their identifiers in `source_language`.
/// Temporaries are named `__<param><Suffix>` unless that clashes with a
/// `reserved` local, a parameter, or an earlier temporary; clashing names
/// move to `__p_<param><Suffix>`, then `__p<n>_<param><Suffix>`.
pub fn convert_params(
    params: &[MarshalledParam],
    from: CodeLanguage,
    to: CodeLanguage,
    source_language: CodeLanguage,
    reserved: &[&str],
    dialect: &dyn HostDialect,
) -> Result<ConvertedParams, ConversionError> {
    let mut converted = ConvertedParams {
        statements: Vec::with_capacity(params.len()),
        arguments: Vec::with_capacity(params.len()),
    };

    let mut taken: FxHashSet<String> = reserved.iter().map(|name| (*name).to_owned()).collect();
    taken.extend(params.iter().map(|p| p.identifier(source_language)));

    for param in params {
        let source = param.identifier(source_language);
        match param.conversion(from, to)? {
            Some(template) => {
                let temp = temporary_name(&param.name, temp_suffix(to), &taken);
                taken.insert(temp.clone());
                converted
                    .statements
                    .push(dialect.render_binding(&BindingDecl::immutable(
                        temp.clone(),
                        template.apply(&source),
                    )));
                converted.arguments.push(temp);
            }
            None => converted.arguments.push(source),
        }
    }

    Ok(converted)
}

fn temporary_name(name: &str, suffix: &str, taken: &FxHashSet<String>) -> String {
    let plain = format!("__{name}{suffix}");
    if !taken.contains(&plain) {
        return plain;
    }
    let mut candidate = format!("__p_{name}{suffix}");
    let mut n = 1_usize;
    while taken.contains(&candidate) {
        candidate = format!("__p{n}_{name}{suffix}");
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests;
