//! Host-language declarations.
//!
//! Declarations are plain values: every recognized setting of a declaration
//! kind is a named field, and construction is a struct literal (usually with
//! `..Default::default()`). Rendering belongs to a [`HostDialect`], so the
//! same declaration renders as Kotlin or Swift.

mod dialect;

pub use dialect::{dialect_for, HostDialect, KotlinDialect, SwiftDialect};

/// Access level of a declaration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Host default; nothing is written.
    #[default]
    Default,
    Public,
    Internal,
    Private,
    /// Public and subclassable.
    Open,
}

/// A class declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    /// Rendered as an inline comment after the name.
    pub comment: Option<String>,
    pub visibility: Visibility,
    pub base_type: Option<String>,
    pub interfaces: Vec<String>,
    /// Rendered `name: Type` pairs of the primary constructor.
    pub constructor_params: Vec<String>,
    /// Arguments forwarded to the base type's constructor.
    pub base_constructor_args: Vec<String>,
    /// Member blocks, separated by an empty line.
    pub members: Vec<String>,
}

/// A function declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunDecl {
    pub name: String,
    pub visibility: Visibility,
    pub is_override: bool,
    pub throws: bool,
    /// Rendered parameter declarations.
    pub params: Vec<String>,
    /// `None` for functions returning nothing.
    pub return_type: Option<String>,
    pub body: String,
}

/// A read-only property with a computed getter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub type_name: String,
    pub visibility: Visibility,
    pub is_override: bool,
    /// Type-level rather than instance-level.
    pub is_static: bool,
    pub throws: bool,
    /// Getter expression.
    pub getter: String,
}

/// A local variable binding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingDecl {
    pub name: String,
    pub mutable: bool,
    pub type_name: Option<String>,
    pub value: Option<String>,
}

impl BindingDecl {
    /// `val`/`let name = value`.
    pub fn immutable(name: impl Into<String>, value: impl Into<String>) -> Self {
        BindingDecl {
            name: name.into(),
            mutable: false,
            type_name: None,
            value: Some(value.into()),
        }
    }
}

#[cfg(test)]
mod tests;
