//! Batch generation.
//!
//! A `BindingSession` owns the descriptor registry for one run and generates
//! a list of types in order. Each type yields exactly one artifact: the
//! bindings, a comment naming the skip reason, or nothing when the type was
//! aborted. Every type without bindings is also recorded in the run's
//! [`SkipManifest`], so nothing disappears silently. One type's failure
//! never affects the next.

use tether_ir::{ReflectionSource, TypeKey};
use tether_types::TypeDescriptorRegistry;

use crate::delegate::{DelegateBinding, DelegateBindingGenerator};
use crate::native::UpstreamState;
use crate::problem::SkipManifest;
use crate::GeneratorConfig;

/// What one type produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactOutcome {
    Generated(Box<DelegateBinding>),
    /// Skipped types leave a comment in the output carrying the reason.
    Skipped { comment: String },
    /// Fatal problem: no output at all.
    Aborted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub key: TypeKey,
    pub type_name: String,
    pub outcome: ArtifactOutcome,
}

impl GeneratedArtifact {
    /// Output text, if the type produced any.
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            ArtifactOutcome::Generated(binding) => Some(&binding.text),
            ArtifactOutcome::Skipped { comment } => Some(comment),
            ArtifactOutcome::Aborted => None,
        }
    }

    pub fn binding(&self) -> Option<&DelegateBinding> {
        match &self.outcome {
            ArtifactOutcome::Generated(binding) => Some(binding),
            _ => None,
        }
    }
}

/// Everything a run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionOutput {
    /// One per requested type, in request order.
    pub artifacts: Vec<GeneratedArtifact>,
    pub manifest: SkipManifest,
}

impl SessionOutput {
    pub fn bindings(&self) -> impl Iterator<Item = &DelegateBinding> {
        self.artifacts.iter().filter_map(GeneratedArtifact::binding)
    }

    pub fn artifact(&self, type_name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.type_name == type_name)
    }

    /// All output text, one block per artifact.
    pub fn render(&self) -> String {
        self.artifacts
            .iter()
            .filter_map(GeneratedArtifact::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One generation run over a reflection source.
pub struct BindingSession<'r> {
    registry: TypeDescriptorRegistry<'r>,
    config: GeneratorConfig,
    upstream: UpstreamState,
}

impl<'r> BindingSession<'r> {
    pub fn new(
        source: &'r dyn ReflectionSource,
        config: GeneratorConfig,
        upstream: UpstreamState,
    ) -> Self {
        BindingSession {
            registry: TypeDescriptorRegistry::new(source, config.resolver()),
            config,
            upstream,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeDescriptorRegistry<'r> {
        &self.registry
    }

    /// Every non-builtin delegate type of the source, in registration order.
    pub fn delegate_keys(&self) -> Vec<TypeKey> {
        let source = self.registry.source();
        source
            .keys()
            .into_iter()
            .filter(|&key| !key.is_builtin())
            .filter(|&key| source.reflected(key).is_some_and(|ty| ty.is_delegate()))
            .collect()
    }

    pub fn generate_all_delegates(&self) -> SessionOutput {
        self.generate(&self.delegate_keys())
    }

    /// Generate bindings for `keys`, in order.
    pub fn generate(&self, keys: &[TypeKey]) -> SessionOutput {
        let _span = tracing::debug_span!("binding_session", host = %self.config.host).entered();
        let generator = DelegateBindingGenerator::new(&self.registry, &self.config);
        let mut output = SessionOutput {
            artifacts: Vec::with_capacity(keys.len()),
            manifest: SkipManifest::new(),
        };

        for &key in keys {
            let type_name = self.type_name(key);
            let outcome = match generator.generate(key, &self.upstream) {
                Ok(binding) => ArtifactOutcome::Generated(Box::new(binding)),
                Err(problem) => {
                    output.manifest.record(type_name.clone(), &problem);
                    if problem.is_fatal() {
                        ArtifactOutcome::Aborted
                    } else {
                        ArtifactOutcome::Skipped {
                            comment: problem.skip_comment(&type_name),
                        }
                    }
                }
            };
            output.artifacts.push(GeneratedArtifact {
                key,
                type_name,
                outcome,
            });
        }

        tracing::info!(
            requested = keys.len(),
            generated = keys.len() - output.manifest.len(),
            skipped = output.manifest.skipped().count(),
            fatal = output.manifest.fatal().count(),
            "binding session finished"
        );
        output
    }

    fn type_name(&self, key: TypeKey) -> String {
        self.registry
            .source()
            .reflected(key)
            .map_or_else(|| key.to_string(), |ty| ty.full_name_or_name().to_owned())
    }
}
