//! Generator configuration.

use bitflags::bitflags;
use tether_ir::HostLanguage;
use tether_types::{NullabilityResolver, ResolvedNullability};

bitflags! {
    /// Opt-in generator features.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FeatureFlags: u32 {
        /// Accept `ref` parameters in delegate signatures instead of skipping
        /// the type. `in` and `out` parameters are always rejected.
        const BY_REF_DELEGATE_PARAMETERS = 1 << 0;
    }
}

/// Settings for one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Host surface to generate for.
    pub host: HostLanguage,
    pub features: FeatureFlags,
    /// Nullability of values nobody annotated.
    pub unspecified_nullability: ResolvedNullability,
}

impl GeneratorConfig {
    pub fn new(host: HostLanguage) -> Self {
        GeneratorConfig {
            host,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn resolver(&self) -> NullabilityResolver {
        NullabilityResolver::new(self.unspecified_nullability)
    }

    pub fn allows_by_ref_parameters(&self) -> bool {
        self.features
            .contains(FeatureFlags::BY_REF_DELEGATE_PARAMETERS)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            host: HostLanguage::Kotlin,
            features: FeatureFlags::empty(),
            unspecified_nullability: ResolvedNullability::NonNullable,
        }
    }
}
