//! Delegate binding generation for the Tether interop generator.
//!
//! Turns managed delegate types into host-language wrapper classes (Kotlin
//! over JNA, or Swift over the C layer). Each wrapper can turn a host closure
//! into a native function pointer plus destructor, and can invoke the managed
//! delegate from the host with exceptions surfaced as host errors.
//!
//! # Pipeline
//!
//! ```text
//! ReflectionSource ─► BindingSession ─► DelegateBindingGenerator ─► DelegateBinding
//!                          │                    │
//!                          │                    ├─ DelegateTypeInfo (resolve, may skip)
//!                          │                    └─ HostDialect (render)
//!                          └─► SkipManifest
//! ```
//!
//! The native layer for a type is produced by an earlier pass and handed in
//! as [`UpstreamState`]. Types that cannot be bound are skipped with a reason;
//! types whose upstream state is missing are aborted. Both end up in the
//! [`SkipManifest`].

mod config;
pub mod delegate;
pub mod marshal;
pub mod native;
pub mod problem;
pub mod session;
pub mod syntax;
pub mod writer;

pub use config::{FeatureFlags, GeneratorConfig};
pub use delegate::{
    CallableFactory, DelegateBinding, DelegateBindingGenerator, DelegateTypeInfo, InvokeAdapter,
};
pub use native::{NativeLayerArtifacts, UpstreamState};
pub use problem::{GenerationProblem, ProblemCode, Severity, SkipEntry, SkipManifest};
pub use session::{ArtifactOutcome, BindingSession, GeneratedArtifact, SessionOutput};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=tether_codegen=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // An embedder may already have installed a subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
