//! Type descriptors and conversion mapping for the Tether binding generator.
//!
//! For every reflected type this crate answers two questions:
//!
//! - what is this type called in a given representation (native ABI,
//!   native-call layer, host surface), with a given nullability and passing
//!   mode?
//! - how is a value of this type converted from one representation to
//!   another?
//!
//! # Architecture
//!
//! ```text
//! ReflectionSource ──► TypeDescriptorRegistry ──► Rc<TypeDescriptor>
//!                              │                      │
//!                              ▼                      ▼
//!                     NullabilityResolver   ConversionTemplateTable
//! ```
//!
//! Descriptors are immutable and memoized: names and conversion templates are
//! computed once, when the registry first describes a type.

mod descriptor;
mod error;
mod kind;
pub mod naming;
mod nullability;
mod registry;
mod template;

pub use descriptor::{NameModifiers, NameRequest, Position, TypeDescriptor};
pub use error::{ConversionError, DescriptorError};
pub use kind::{DescriptorKind, ValueKind};
pub use nullability::{NullabilityResolver, ResolvedNullability};
pub use registry::TypeDescriptorRegistry;
pub use template::{ConversionTemplate, ConversionTemplateTable, TableEntry, PLACEHOLDER};
