//! Three-state nullability lattice.

/// Nullability as annotated in the reflected model.
///
/// `NotSpecified` is a legitimate input state (oblivious code) but must be
/// resolved before anything is emitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nullability {
    NonNullable,
    Nullable,
    #[default]
    NotSpecified,
}

impl Nullability {
    #[inline]
    pub const fn is_specified(self) -> bool {
        !matches!(self, Nullability::NotSpecified)
    }

    /// `self` if specified, `fallback` otherwise.
    #[inline]
    #[must_use]
    pub const fn or(self, fallback: Nullability) -> Nullability {
        match self {
            Nullability::NotSpecified => fallback,
            specified => specified,
        }
    }
}
