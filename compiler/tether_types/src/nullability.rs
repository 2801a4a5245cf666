//! Nullability resolution.
//!
//! Precedence is explicit member annotation, then the descriptor's default,
//! then `NotSpecified`. Anything that ends up in emitted text goes through
//! [`NullabilityResolver::resolve_for_emission`], which only returns the two
//! concrete states.

use tether_ir::Nullability;

/// Nullability after resolution. The only form name computation accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ResolvedNullability {
    #[default]
    NonNullable,
    Nullable,
}

impl ResolvedNullability {
    pub const ALL: [ResolvedNullability; 2] =
        [ResolvedNullability::NonNullable, ResolvedNullability::Nullable];

    #[inline]
    pub const fn is_nullable(self) -> bool {
        matches!(self, ResolvedNullability::Nullable)
    }
}

impl From<ResolvedNullability> for Nullability {
    fn from(value: ResolvedNullability) -> Self {
        match value {
            ResolvedNullability::NonNullable => Nullability::NonNullable,
            ResolvedNullability::Nullable => Nullability::Nullable,
        }
    }
}

/// Resolves annotations against descriptor defaults.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct NullabilityResolver {
    /// What a fully unannotated value becomes at emission sites.
    unspecified: ResolvedNullability,
}

impl NullabilityResolver {
    pub const fn new(unspecified: ResolvedNullability) -> Self {
        NullabilityResolver { unspecified }
    }

    pub const fn unspecified_default(&self) -> ResolvedNullability {
        self.unspecified
    }

    /// Apply precedence. May still be `NotSpecified`.
    #[inline]
    pub const fn resolve(member: Nullability, descriptor_default: Nullability) -> Nullability {
        member.or(descriptor_default)
    }

    /// Apply precedence and commit to a concrete state.
    pub const fn resolve_for_emission(
        &self,
        member: Nullability,
        descriptor_default: Nullability,
    ) -> ResolvedNullability {
        self.concretize(Self::resolve(member, descriptor_default))
    }

    pub const fn concretize(&self, nullability: Nullability) -> ResolvedNullability {
        match nullability {
            Nullability::NonNullable => ResolvedNullability::NonNullable,
            Nullability::Nullable => ResolvedNullability::Nullable,
            Nullability::NotSpecified => self.unspecified,
        }
    }
}
