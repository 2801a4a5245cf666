//! The `invoke` adapter: calls the delegate through the native layer.

use super::{DelegateTypeInfo, InvokeAdapter};
use crate::marshal;
use crate::native::NativeLayerArtifacts;
use crate::syntax::{BindingDecl, FunDecl, HostDialect, Visibility};
use crate::writer::CodeWriter;
use crate::GenerationProblem;

const SELF_HANDLE: &str = "__selfC";
const EXCEPTION_SLOT: &str = "__exceptionC";
const NATIVE_RETURN_VALUE: &str = "__returnValueC";
const RETURN_VALUE: &str = "__returnValue";

/// Locals of the adapter body, including those the exception check binds
/// on either host.
const RESERVED_LOCALS: &[&str] = &[
    SELF_HANDLE,
    EXCEPTION_SLOT,
    NATIVE_RETURN_VALUE,
    RETURN_VALUE,
    "__exceptionCValue",
    "__exception",
    "__error",
];

pub(super) fn invoke_adapter(
    info: &DelegateTypeInfo,
    native: &NativeLayerArtifacts,
    dialect: &dyn HostDialect,
) -> Result<InvokeAdapter, GenerationProblem> {
    let host = info.host.language();
    let native_language = info.host.native_call_language();
    let is_returning = info.is_returning();

    let converted = marshal::convert_params(
        &info.params,
        host,
        native_language,
        host,
        RESERVED_LOCALS,
        dialect,
    )?;

    let mut native_args = Vec::with_capacity(converted.arguments.len() + 2);
    native_args.push(SELF_HANDLE.to_owned());
    native_args.extend(converted.arguments);
    native_args.push(dialect.exception_slot_arg(EXCEPTION_SLOT));

    let mut writer = CodeWriter::new();
    writer.writeln(&dialect.exception_slot(EXCEPTION_SLOT));
    writer.writeln(&dialect.render_binding(&BindingDecl::immutable(
        SELF_HANDLE,
        dialect.self_handle(),
    )));
    writer.newline();

    if !converted.statements.is_empty() {
        for statement in &converted.statements {
            writer.write_block(statement);
        }
        writer.newline();
    }

    let call = format!("{}({})", native.invoke_function, native_args.join(", "));
    if is_returning {
        writer.writeln(&dialect.render_binding(&BindingDecl::immutable(NATIVE_RETURN_VALUE, call)));
    } else {
        writer.writeln(&call);
    }
    writer.newline();

    // Raise before the result is touched.
    writer.write_block(&dialect.exception_check(EXCEPTION_SLOT));

    if is_returning {
        writer.newline();
        let conversion =
            info.return_descriptor
                .convert(native_language, host, info.return_nullability)?;
        let returned = match conversion {
            Some(template) => {
                writer.writeln(&dialect.render_binding(&BindingDecl::immutable(
                    RETURN_VALUE,
                    template.apply(NATIVE_RETURN_VALUE),
                )));
                RETURN_VALUE
            }
            None => NATIVE_RETURN_VALUE,
        };
        writer.writeln(&dialect.return_statement(returned));
    }

    let is_override = info.is_override();
    let decl = FunDecl {
        name: "invoke".to_owned(),
        // Left open so derived wrappers can override it.
        visibility: if is_override {
            Visibility::Public
        } else {
            Visibility::Open
        },
        is_override,
        throws: true,
        params: marshal::declarations(&info.params, dialect, host),
        return_type: is_returning.then(|| info.return_type_name(host)),
        body: writer.finish(),
    };

    Ok(InvokeAdapter {
        is_override,
        native_function: native.invoke_function.clone(),
        native_args,
        is_returning,
        text: dialect.render_fun(&decl),
    })
}
