//! Factories handing a host closure to native code.
//!
//! The closure is boxed behind an opaque context pointer. The native side
//! receives a function pointer that unboxes it on every call, and a
//! destructor pointer that releases the box exactly once.

use tether_types::ValueKind;

use super::{CallableFactory, DelegateTypeInfo, CONTEXT_PARAM};
use crate::marshal::{self, temp_suffix};
use crate::native::NativeLayerArtifacts;
use crate::syntax::{BindingDecl, FunDecl, HostDialect, Visibility};
use crate::writer::CodeWriter;
use crate::GenerationProblem;

const CREATE_CALLABLE: &str = "__createCFunction";
const CREATE_DESTRUCTOR: &str = "__createCDestructorFunction";

const INNER_CLOSURE: &str = "__innerClosure";
const RETURN_VALUE: &str = "__returnValue";

/// `__createCFunction`: the native function pointer calling the closure.
pub(super) fn create_callable(
    info: &DelegateTypeInfo,
    native: &NativeLayerArtifacts,
    dialect: &dyn HostDialect,
) -> Result<CallableFactory, GenerationProblem> {
    let host = info.host.language();
    let native_language = info.host.native_call_language();
    let suffix = temp_suffix(host);
    let closure_type = info.closure_type(dialect);
    let host_context = format!("__inner{suffix}Context");

    let mut literal_params = Vec::with_capacity(1 + info.params.len());
    literal_params.push(CONTEXT_PARAM.to_owned());
    // The literal is host syntax, so its parameters are named as host
    // identifiers even though they hold native values.
    literal_params.extend(marshal::identifiers(&info.params, host));

    let host_value = format!("{RETURN_VALUE}{suffix}");
    let reserved = [
        CONTEXT_PARAM,
        host_context.as_str(),
        INNER_CLOSURE,
        host_value.as_str(),
        RETURN_VALUE,
    ];
    let converted = marshal::convert_params(
        &info.params,
        native_language,
        host,
        host,
        &reserved,
        dialect,
    )?;

    let mut writer = CodeWriter::new();
    writer.writeln(&dialect.return_statement(
        &dialect.callback_literal_open(&native.function_type, &literal_params),
    ));
    writer.indent();
    writer.writeln(&dialect.context_guard(CONTEXT_PARAM));
    writer.newline();
    writer.writeln(&dialect.render_binding(&BindingDecl::immutable(
        host_context.clone(),
        dialect.unbox_context(CONTEXT_PARAM, &closure_type),
    )));
    writer.writeln(&dialect.render_binding(&BindingDecl::immutable(
        INNER_CLOSURE,
        format!("{host_context}.value"),
    )));
    writer.newline();

    if !converted.statements.is_empty() {
        for statement in &converted.statements {
            writer.write_block(statement);
        }
        writer.newline();
    }

    let invocation = format!("{INNER_CLOSURE}({})", converted.arguments.join(", "));
    if info.is_returning() {
        writer.writeln(
            &dialect.render_binding(&BindingDecl::immutable(host_value.clone(), invocation)),
        );

        let conversion =
            info.return_descriptor
                .convert(host, native_language, info.return_nullability)?;
        let returned = match conversion {
            Some(template) => {
                writer.writeln(&dialect.render_binding(&BindingDecl::immutable(
                    RETURN_VALUE,
                    template.apply(&host_value),
                )));
                RETURN_VALUE.to_owned()
            }
            None => host_value.clone(),
        };

        // The native side now owns the returned object.
        if info.return_descriptor.kind().value_kind() == Some(ValueKind::ReferenceObject) {
            writer.writeln(
                &dialect.suppress_destroy(&host_value, info.return_nullability.is_nullable()),
            );
        }
        writer.newline();
        writer.writeln(&dialect.callback_return(&native.function_type, &returned));
    } else {
        writer.writeln(&invocation);
    }

    writer.dedent();
    writer.writeln("}");

    Ok(factory(
        CREATE_CALLABLE,
        &native.function_type,
        writer.finish(),
        dialect,
    ))
}

/// `__createCDestructorFunction`: releases the boxed closure.
pub(super) fn create_destructor(
    info: &DelegateTypeInfo,
    native: &NativeLayerArtifacts,
    dialect: &dyn HostDialect,
) -> CallableFactory {
    let closure_type = info.closure_type(dialect);

    let mut writer = CodeWriter::new();
    writer.writeln(&dialect.return_statement(&dialect.callback_literal_open(
        &native.destructor_function_type,
        &[CONTEXT_PARAM.to_owned()],
    )));
    writer.indent();
    writer.writeln(&dialect.context_guard(CONTEXT_PARAM));
    writer.newline();
    writer.writeln(&dialect.release_context(CONTEXT_PARAM, &closure_type));
    writer.dedent();
    writer.writeln("}");

    factory(
        CREATE_DESTRUCTOR,
        &native.destructor_function_type,
        writer.finish(),
        dialect,
    )
}

fn factory(
    name: &str,
    return_type: &str,
    body: String,
    dialect: &dyn HostDialect,
) -> CallableFactory {
    let decl = FunDecl {
        name: name.to_owned(),
        visibility: Visibility::Private,
        return_type: Some(return_type.to_owned()),
        body,
        ..FunDecl::default()
    };
    CallableFactory {
        name: name.to_owned(),
        return_type: return_type.to_owned(),
        text: dialect.render_fun(&decl),
    }
}
