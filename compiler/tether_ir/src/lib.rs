//! Reflected type model for the Tether binding generator.
//!
//! This crate is the input side of the generator: a flat arena of reflected
//! managed types ([`TypeUniverse`]) addressed by stable [`TypeKey`]s, and the
//! [`ReflectionSource`] trait the rest of the pipeline reads through.
//!
//! # Design
//!
//! - No embedded references between types. Base types, parameter types and
//!   generic arguments are all keys, so the model is trivially `Clone` and
//!   cycles are representable without ownership tricks.
//! - Builtin runtime types (primitives, `System.String`, `System.Object`,
//!   the delegate roots) live at fixed keys.
//! - Nullability is the raw three-state annotation; resolving it is the job
//!   of `tether_types`.

mod language;
mod nullability;
mod reflected;
mod type_key;
mod universe;

pub use language::{CodeLanguage, HostLanguage};
pub use nullability::Nullability;
pub use reflected::{InvokeSignature, ParamInfo, ParamMode, PrimitiveKind, ReflectedType, TypeKind};
pub use type_key::TypeKey;
pub use universe::{ReflectionSource, TypeUniverse};
