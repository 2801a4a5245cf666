//! Per-host rendering.
//!
//! A [`HostDialect`] turns declaration values into source text and supplies
//! the handful of statement forms the delegate protocol needs (context guard,
//! unboxing, exception slot, ...). Emitters never format host syntax
//! themselves.

use tether_ir::HostLanguage;

use super::{BindingDecl, ClassDecl, FunDecl, PropertyDecl, Visibility};
use crate::writer::CodeWriter;

/// Message raised when a callback receives a null context pointer.
pub const NIL_CONTEXT_MESSAGE: &str = "Context is nil";

pub trait HostDialect {
    fn host(&self) -> HostLanguage;

    // Declarations

    fn render_class(&self, decl: &ClassDecl) -> String;
    fn render_fun(&self, decl: &FunDecl) -> String;
    /// Render properties as one block. Type-level properties are grouped the
    /// way the host requires.
    fn render_properties(&self, decls: &[PropertyDecl]) -> String;
    fn render_binding(&self, decl: &BindingDecl) -> String;
    fn parameter(&self, name: &str, type_name: &str) -> String;

    /// Constructor parameters and base constructor arguments of a wrapper
    /// around a native handle.
    fn handle_constructor(&self) -> (Vec<String>, Vec<String>);

    // Statements and expressions

    fn closure_type(&self, param_types: &[String], return_type: &str) -> String {
        format!("({}) -> {return_type}", param_types.join(", "))
    }

    /// Opening line of a native function-pointer literal. Closed by `}`.
    fn callback_literal_open(&self, function_type: &str, params: &[String]) -> String;

    /// Return from inside a function-pointer literal.
    fn callback_return(&self, function_type: &str, expr: &str) -> String;

    fn return_statement(&self, expr: &str) -> String {
        format!("return {expr}")
    }

    /// Abort when `context` is null; afterwards `context` is non-null.
    fn context_guard(&self, context: &str) -> String;

    /// Expression recovering the boxed closure holder from `context`.
    fn unbox_context(&self, context: &str, closure_type: &str) -> String;

    /// Statement releasing the boxed closure behind `context`.
    fn release_context(&self, context: &str, closure_type: &str) -> String;

    /// Statement handing ownership of `value` to the managed side.
    fn suppress_destroy(&self, value: &str, nullable: bool) -> String;

    /// Expression for the native handle of the current instance.
    fn self_handle(&self) -> &'static str;

    /// Declaration of the exception output slot.
    fn exception_slot(&self, slot: &str) -> String;

    /// The slot as passed to a native call.
    fn exception_slot_arg(&self, slot: &str) -> String;

    /// Check the slot and raise a host error when it is set.
    fn exception_check(&self, slot: &str) -> String;
}

/// Dialect for `host`.
pub fn dialect_for(host: HostLanguage) -> &'static dyn HostDialect {
    match host {
        HostLanguage::Kotlin => &KotlinDialect,
        HostLanguage::Swift => &SwiftDialect,
    }
}

fn render_body(writer: &mut CodeWriter, body: &str) {
    writer.indent();
    writer.write_block(body);
    writer.dedent();
}

// ---------------------------------------------------------------------------
// Kotlin
// ---------------------------------------------------------------------------

/// Kotlin over JNA.
#[derive(Copy, Clone, Debug, Default)]
pub struct KotlinDialect;

impl KotlinDialect {
    fn visibility(visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::Default | Visibility::Public => "",
            Visibility::Internal => "internal ",
            Visibility::Private => "private ",
            Visibility::Open => "open ",
        }
    }

    fn property(decl: &PropertyDecl) -> String {
        let mut lines = Vec::with_capacity(3);
        if decl.is_static {
            lines.push("@JvmStatic".to_owned());
        }
        if decl.throws {
            lines.push("@get:Throws(Throwable::class)".to_owned());
        }
        // Companion members cannot override.
        let override_kw = if decl.is_override && !decl.is_static {
            "override "
        } else {
            ""
        };
        lines.push(format!(
            "{}{override_kw}val {}: {} get() = {}",
            Self::visibility(decl.visibility),
            decl.name,
            decl.type_name,
            decl.getter
        ));
        lines.join("\n")
    }
}

impl HostDialect for KotlinDialect {
    fn host(&self) -> HostLanguage {
        HostLanguage::Kotlin
    }

    fn render_class(&self, decl: &ClassDecl) -> String {
        let mut header = format!("{}class {}", Self::visibility(decl.visibility), decl.name);
        if let Some(comment) = &decl.comment {
            header.push_str(&format!(" /* {comment} */"));
        }
        if !decl.constructor_params.is_empty() {
            header.push_str(&format!("({})", decl.constructor_params.join(", ")));
        }

        let mut supertypes = Vec::with_capacity(1 + decl.interfaces.len());
        if let Some(base) = &decl.base_type {
            supertypes.push(format!("{base}({})", decl.base_constructor_args.join(", ")));
        }
        supertypes.extend(decl.interfaces.iter().cloned());
        if !supertypes.is_empty() {
            header.push_str(&format!(" : {}", supertypes.join(", ")));
        }
        header.push_str(" {");

        let mut writer = CodeWriter::new();
        writer.writeln(&header);
        writer.indent();
        writer.write_blocks(&decl.members);
        writer.dedent();
        writer.writeln("}");
        writer.finish()
    }

    fn render_fun(&self, decl: &FunDecl) -> String {
        let mut writer = CodeWriter::new();
        if decl.throws {
            writer.writeln("@Throws(Throwable::class)");
        }
        let override_kw = if decl.is_override { "override " } else { "" };
        let return_type = decl
            .return_type
            .as_ref()
            .map_or_else(String::new, |ty| format!(": {ty}"));
        writer.writeln(&format!(
            "{}{override_kw}fun {}({}){return_type} {{",
            Self::visibility(decl.visibility),
            decl.name,
            decl.params.join(", ")
        ));
        render_body(&mut writer, &decl.body);
        writer.writeln("}");
        writer.finish()
    }

    fn render_properties(&self, decls: &[PropertyDecl]) -> String {
        let (statics, instance): (Vec<&PropertyDecl>, Vec<&PropertyDecl>) =
            decls.iter().partition(|p| p.is_static);

        let mut blocks = Vec::new();
        if !statics.is_empty() {
            let members: Vec<String> = statics.into_iter().map(Self::property).collect();
            let mut writer = CodeWriter::new();
            writer.writeln("companion object {");
            writer.indent();
            writer.write_blocks(&members);
            writer.dedent();
            writer.writeln("}");
            blocks.push(writer.finish());
        }
        blocks.extend(instance.into_iter().map(Self::property));
        blocks.join("\n\n")
    }

    fn render_binding(&self, decl: &BindingDecl) -> String {
        let keyword = if decl.mutable { "var" } else { "val" };
        let mut out = format!("{keyword} {}", decl.name);
        if let Some(ty) = &decl.type_name {
            out.push_str(&format!(": {ty}"));
        }
        if let Some(value) = &decl.value {
            out.push_str(&format!(" = {value}"));
        }
        out
    }

    fn parameter(&self, name: &str, type_name: &str) -> String {
        format!("{name}: {type_name}")
    }

    fn handle_constructor(&self) -> (Vec<String>, Vec<String>) {
        (vec!["handle: Pointer".to_owned()], vec!["handle".to_owned()])
    }

    fn callback_literal_open(&self, function_type: &str, params: &[String]) -> String {
        format!("{function_type} {{ {} ->", params.join(", "))
    }

    fn callback_return(&self, function_type: &str, expr: &str) -> String {
        format!("return@{function_type} {expr}")
    }

    fn context_guard(&self, context: &str) -> String {
        format!("checkNotNull({context}) {{ \"{NIL_CONTEXT_MESSAGE}\" }}")
    }

    fn unbox_context(&self, context: &str, closure_type: &str) -> String {
        format!("NativeBox.fromPointer<{closure_type}>({context})")
    }

    fn release_context(&self, context: &str, closure_type: &str) -> String {
        format!("NativeBox.release<{closure_type}>({context})")
    }

    fn suppress_destroy(&self, value: &str, nullable: bool) -> String {
        let access = if nullable { "?." } else { "." };
        format!("{value}{access}__destroyMode = DestroyMode.SKIP // Will be destroyed by the managed runtime")
    }

    fn self_handle(&self) -> &'static str {
        "this.__handle"
    }

    fn exception_slot(&self, slot: &str) -> String {
        format!("val {slot} = PointerByReference()")
    }

    fn exception_slot_arg(&self, slot: &str) -> String {
        slot.to_owned()
    }

    fn exception_check(&self, slot: &str) -> String {
        let mut writer = CodeWriter::new();
        writer.writeln(&format!("val {slot}Value = {slot}.value"));
        writer.writeln(&format!("if ({slot}Value != null) {{"));
        writer.indent();
        writer.writeln(&format!("throw System_Exception({slot}Value).toKotlinException()"));
        writer.dedent();
        writer.writeln("}");
        writer.finish()
    }
}

// ---------------------------------------------------------------------------
// Swift
// ---------------------------------------------------------------------------

/// Swift over the C layer.
///
/// Swift classes have no primary constructor; `constructor_params` and
/// `base_constructor_args` of a [`ClassDecl`] are not rendered.
#[derive(Copy, Clone, Debug, Default)]
pub struct SwiftDialect;

impl SwiftDialect {
    fn visibility(visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::Default => "",
            Visibility::Public => "public ",
            Visibility::Internal => "internal ",
            Visibility::Private => "private ",
            Visibility::Open => "open ",
        }
    }

    fn property(decl: &PropertyDecl) -> String {
        let override_kw = if decl.is_override { "override " } else { "" };
        let static_kw = if decl.is_static { "class " } else { "" };
        let accessor = if decl.throws {
            format!("{{ get throws {{ {} }} }}", decl.getter)
        } else {
            format!("{{ {} }}", decl.getter)
        };
        format!(
            "{}{override_kw}{static_kw}var {}: {} {accessor}",
            Self::visibility(decl.visibility),
            decl.name,
            decl.type_name
        )
    }
}

impl HostDialect for SwiftDialect {
    fn host(&self) -> HostLanguage {
        HostLanguage::Swift
    }

    fn render_class(&self, decl: &ClassDecl) -> String {
        let mut header = format!("{}class {}", Self::visibility(decl.visibility), decl.name);
        if let Some(comment) = &decl.comment {
            header.push_str(&format!(" /* {comment} */"));
        }

        let supertypes: Vec<&str> = decl
            .base_type
            .iter()
            .chain(decl.interfaces.iter())
            .map(String::as_str)
            .collect();
        if !supertypes.is_empty() {
            header.push_str(&format!(": {}", supertypes.join(", ")));
        }
        header.push_str(" {");

        let mut writer = CodeWriter::new();
        writer.writeln(&header);
        writer.indent();
        writer.write_blocks(&decl.members);
        writer.dedent();
        writer.writeln("}");
        writer.finish()
    }

    fn render_fun(&self, decl: &FunDecl) -> String {
        let override_kw = if decl.is_override { "override " } else { "" };
        let throws = if decl.throws { " throws" } else { "" };
        let return_type = decl
            .return_type
            .as_ref()
            .map_or_else(String::new, |ty| format!(" -> {ty}"));

        let mut writer = CodeWriter::new();
        writer.writeln(&format!(
            "{}{override_kw}func {}({}){throws}{return_type} {{",
            Self::visibility(decl.visibility),
            decl.name,
            decl.params.join(", ")
        ));
        render_body(&mut writer, &decl.body);
        writer.writeln("}");
        writer.finish()
    }

    fn render_properties(&self, decls: &[PropertyDecl]) -> String {
        decls
            .iter()
            .map(Self::property)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_binding(&self, decl: &BindingDecl) -> String {
        let keyword = if decl.mutable { "var" } else { "let" };
        let mut out = format!("{keyword} {}", decl.name);
        if let Some(ty) = &decl.type_name {
            out.push_str(&format!(": {ty}"));
        }
        if let Some(value) = &decl.value {
            out.push_str(&format!(" = {value}"));
        }
        out
    }

    fn parameter(&self, name: &str, type_name: &str) -> String {
        format!("_ {name}: {type_name}")
    }

    fn handle_constructor(&self) -> (Vec<String>, Vec<String>) {
        (Vec::new(), Vec::new())
    }

    fn callback_literal_open(&self, _function_type: &str, params: &[String]) -> String {
        format!("{{ {} in", params.join(", "))
    }

    fn callback_return(&self, _function_type: &str, expr: &str) -> String {
        self.return_statement(expr)
    }

    fn context_guard(&self, context: &str) -> String {
        format!("guard let {context} else {{ fatalError(\"{NIL_CONTEXT_MESSAGE}\") }}")
    }

    fn unbox_context(&self, context: &str, closure_type: &str) -> String {
        format!("NativeBox<{closure_type}>.fromPointer({context})")
    }

    fn release_context(&self, context: &str, closure_type: &str) -> String {
        format!("NativeBox<{closure_type}>.release({context})")
    }

    fn suppress_destroy(&self, value: &str, nullable: bool) -> String {
        let access = if nullable { "?." } else { "." };
        format!("{value}{access}__destroyMode = .skip // Will be destroyed by the managed runtime")
    }

    fn self_handle(&self) -> &'static str {
        "self.__handle"
    }

    fn exception_slot(&self, slot: &str) -> String {
        format!("var {slot}: System_Exception_t?")
    }

    fn exception_slot_arg(&self, slot: &str) -> String {
        format!("&{slot}")
    }

    fn exception_check(&self, slot: &str) -> String {
        let mut writer = CodeWriter::new();
        writer.writeln(&format!("if let {slot} {{"));
        writer.indent();
        writer.writeln(&format!("let __exception = System_Exception(handle: {slot})"));
        writer.writeln("let __error = __exception.swiftError");
        writer.newline();
        writer.writeln("throw __error");
        writer.dedent();
        writer.writeln("}");
        writer.finish()
    }
}
