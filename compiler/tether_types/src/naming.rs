//! Identifier rules shared by every representation.
//!
//! - Managed full names become C identifiers: separators turn into `_`, generic
//!   arity markers (`` `1 ``) into `_A1`, array brackets into `_Array`.
//! - Host identifiers that collide with a host keyword are wrapped in
//!   backticks.
//! - Primitive keywords per representation live in [`primitive_name`].

use tether_ir::{CodeLanguage, PrimitiveKind};

/// Turn a managed full name into a C identifier.
pub fn c_identifier(full_name: &str) -> String {
    let mut out = String::with_capacity(full_name.len() + 4);
    let mut chars = full_name.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '`' => out.push_str("_A"),
            '[' if chars.peek() == Some(&']') => {
                chars.next();
                out.push_str("_Array");
            }
            c if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
            _ => out.push('_'),
        }
    }

    out
}

/// Primitive keyword in `language`.
pub const fn primitive_name(prim: PrimitiveKind, language: CodeLanguage) -> &'static str {
    match language {
        CodeLanguage::C => match prim {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "wchar_t",
            PrimitiveKind::SByte => "int8_t",
            PrimitiveKind::Byte => "uint8_t",
            PrimitiveKind::Int16 => "int16_t",
            PrimitiveKind::UInt16 => "uint16_t",
            PrimitiveKind::Int32 => "int32_t",
            PrimitiveKind::UInt32 => "uint32_t",
            PrimitiveKind::Int64 => "int64_t",
            PrimitiveKind::UInt64 => "uint64_t",
            PrimitiveKind::Float32 => "float",
            PrimitiveKind::Float64 => "double",
            PrimitiveKind::IntPtr => "intptr_t",
            PrimitiveKind::UIntPtr => "uintptr_t",
        },
        CodeLanguage::KotlinJna => match prim {
            PrimitiveKind::Bool => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::SByte | PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Int16 | PrimitiveKind::UInt16 => "Short",
            PrimitiveKind::Int32 | PrimitiveKind::UInt32 => "Int",
            PrimitiveKind::Int64
            | PrimitiveKind::UInt64
            | PrimitiveKind::IntPtr
            | PrimitiveKind::UIntPtr => "Long",
            PrimitiveKind::Float32 => "Float",
            PrimitiveKind::Float64 => "Double",
        },
        CodeLanguage::Kotlin => match prim {
            PrimitiveKind::Bool => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::SByte => "Byte",
            PrimitiveKind::Byte => "UByte",
            PrimitiveKind::Int16 => "Short",
            PrimitiveKind::UInt16 => "UShort",
            PrimitiveKind::Int32 => "Int",
            PrimitiveKind::UInt32 => "UInt",
            PrimitiveKind::Int64 | PrimitiveKind::IntPtr => "Long",
            PrimitiveKind::UInt64 | PrimitiveKind::UIntPtr => "ULong",
            PrimitiveKind::Float32 => "Float",
            PrimitiveKind::Float64 => "Double",
        },
        CodeLanguage::Swift => match prim {
            PrimitiveKind::Bool => "Bool",
            PrimitiveKind::Char => "DNChar",
            PrimitiveKind::SByte => "Int8",
            PrimitiveKind::Byte => "UInt8",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::UInt16 => "UInt16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::UInt32 => "UInt32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::UInt64 => "UInt64",
            PrimitiveKind::Float32 => "Float",
            PrimitiveKind::Float64 => "Double",
            PrimitiveKind::IntPtr => "Int",
            PrimitiveKind::UIntPtr => "UInt",
        },
    }
}

const KOTLIN_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

const SWIFT_KEYWORDS: &[&str] = &[
    "Any", "Self", "as", "associatedtype", "break", "case", "catch", "class", "continue",
    "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough", "false",
    "fileprivate", "for", "func", "guard", "if", "import", "in", "init", "inout", "internal",
    "is", "let", "nil", "open", "operator", "private", "protocol", "public", "repeat",
    "rethrows", "return", "self", "static", "struct", "subscript", "super", "switch", "throw",
    "throws", "true", "try", "typealias", "var", "where", "while",
];

/// Make `name` usable as an identifier in `language`.
pub fn escape_identifier(name: &str, language: CodeLanguage) -> String {
    let keywords = match language {
        CodeLanguage::Kotlin | CodeLanguage::KotlinJna => KOTLIN_KEYWORDS,
        CodeLanguage::Swift => SWIFT_KEYWORDS,
        CodeLanguage::C => return name.to_owned(),
    };

    if keywords.contains(&name) {
        format!("`{name}`")
    } else {
        name.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn c_identifier_sanitizes_separators() {
        assert_eq!(c_identifier("MyApp.Callback"), "MyApp_Callback");
        assert_eq!(c_identifier("MyApp.Outer+Inner"), "MyApp_Outer_Inner");
        assert_eq!(
            c_identifier("System.Collections.Generic.List`1"),
            "System_Collections_Generic_List_A1"
        );
        assert_eq!(c_identifier("System.Int32[]"), "System_Int32_Array");
    }

    #[test]
    fn keywords_are_escaped_per_host() {
        assert_eq!(escape_identifier("object", CodeLanguage::Kotlin), "`object`");
        assert_eq!(escape_identifier("object", CodeLanguage::Swift), "object");
        assert_eq!(escape_identifier("self", CodeLanguage::Swift), "`self`");
        assert_eq!(escape_identifier("value", CodeLanguage::Kotlin), "value");
        assert_eq!(escape_identifier("in", CodeLanguage::C), "in");
    }

    #[test]
    fn unsigned_primitives_differ_only_in_hosts() {
        assert_eq!(primitive_name(PrimitiveKind::UInt32, CodeLanguage::KotlinJna), "Int");
        assert_eq!(primitive_name(PrimitiveKind::UInt32, CodeLanguage::Kotlin), "UInt");
        assert_eq!(primitive_name(PrimitiveKind::UInt32, CodeLanguage::Swift), "UInt32");
        assert_eq!(primitive_name(PrimitiveKind::UInt32, CodeLanguage::C), "uint32_t");
    }
}
