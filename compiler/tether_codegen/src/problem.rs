//! Generation problems and the skip manifest.
//!
//! Every type that does not produce bindings ends up here, in one of two
//! tiers:
//!
//! - **Skipped**: the input is something the generator does not support
//!   (no full name, `out` parameters, ...). The run continues.
//! - **Fatal**: state that an earlier pipeline stage should have produced is
//!   missing. That type is aborted without output; the run continues with
//!   the next type, and the manifest records the difference.

use std::fmt;

use tether_ir::{HostLanguage, ParamMode};
use tether_types::{ConversionError, DescriptorError};

/// Problem codes.
///
/// Format: E#### where the first digit indicates the tier:
/// - E7xxx: recoverable skips
/// - E8xxx: fatal pipeline-ordering violations
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ProblemCode {
    /// Type has no full name
    E7001,
    /// Not a delegate type
    E7002,
    /// Unsupported parameter passing mode
    E7003,
    /// By-ref return type
    E7004,
    /// Delegate without invoke signature
    E7005,
    /// Parameter or return type cannot be described
    E7006,
    /// No conversion for a parameter or return value
    E7007,
    /// Native layer result missing
    E8001,
    /// Native layer result does not belong to this type
    E8002,
}

impl ProblemCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemCode::E7001 => "E7001",
            ProblemCode::E7002 => "E7002",
            ProblemCode::E7003 => "E7003",
            ProblemCode::E7004 => "E7004",
            ProblemCode::E7005 => "E7005",
            ProblemCode::E7006 => "E7006",
            ProblemCode::E7007 => "E7007",
            ProblemCode::E8001 => "E8001",
            ProblemCode::E8002 => "E8002",
        }
    }
}

impl fmt::Display for ProblemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    Skipped,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Severity::Skipped => "skipped",
            Severity::Fatal => "fatal",
        })
    }
}

/// Why a type did not produce bindings. `Display` is the reason text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationProblem {
    #[error("It has no full name.")]
    NoFullName,

    #[error("It is not a delegate type.")]
    NotADelegate,

    #[error("Unsupported delegate type ({host}): has {} parameters", mode_label(.mode))]
    UnsupportedParameter { host: HostLanguage, mode: ParamMode },

    #[error("Unsupported delegate type ({host}): has by ref return type")]
    ByRefReturn { host: HostLanguage },

    #[error("Unsupported delegate type ({host}): has no invoke method")]
    MissingInvoke { host: HostLanguage },

    #[error("Unresolvable type in signature: {0}")]
    UnresolvableType(DescriptorError),

    #[error("Unsupported conversion: {0}")]
    Conversion(ConversionError),

    #[error("No native layer result for `{type_name}`; the native layer must be generated first")]
    MissingNativeLayer { type_name: String },

    #[error("Native layer result for `{type_name}` names `{found}`, expected `{expected}`")]
    NativeLayerMismatch {
        type_name: String,
        expected: String,
        found: String,
    },
}

fn mode_label(mode: &ParamMode) -> &'static str {
    match mode {
        ParamMode::Out => "out",
        ParamMode::In => "in",
        ParamMode::Ref | ParamMode::ByValue => "by ref",
    }
}

impl GenerationProblem {
    pub fn code(&self) -> ProblemCode {
        match self {
            GenerationProblem::NoFullName => ProblemCode::E7001,
            GenerationProblem::NotADelegate => ProblemCode::E7002,
            GenerationProblem::UnsupportedParameter { .. } => ProblemCode::E7003,
            GenerationProblem::ByRefReturn { .. } => ProblemCode::E7004,
            GenerationProblem::MissingInvoke { .. } => ProblemCode::E7005,
            GenerationProblem::UnresolvableType(_) => ProblemCode::E7006,
            GenerationProblem::Conversion(_) => ProblemCode::E7007,
            GenerationProblem::MissingNativeLayer { .. } => ProblemCode::E8001,
            GenerationProblem::NativeLayerMismatch { .. } => ProblemCode::E8002,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            GenerationProblem::MissingNativeLayer { .. }
            | GenerationProblem::NativeLayerMismatch { .. } => Severity::Fatal,
            _ => Severity::Skipped,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Comment emitted in place of a skipped type's bindings.
    pub fn skip_comment(&self, type_name: &str) -> String {
        format!("// Type \"{type_name}\" was skipped. Reason: {self}")
    }
}

impl From<DescriptorError> for GenerationProblem {
    fn from(err: DescriptorError) -> Self {
        match err {
            DescriptorError::NoFullName { .. } => GenerationProblem::NoFullName,
            other => GenerationProblem::UnresolvableType(other),
        }
    }
}

impl From<ConversionError> for GenerationProblem {
    fn from(err: ConversionError) -> Self {
        GenerationProblem::Conversion(err)
    }
}

/// One manifest line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkipEntry {
    pub type_name: String,
    pub code: ProblemCode,
    pub severity: Severity,
    pub reason: String,
}

/// Every type that did not produce bindings in a run, in encounter order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkipManifest {
    entries: Vec<SkipEntry>,
}

impl SkipManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, type_name: impl Into<String>, problem: &GenerationProblem) {
        let entry = SkipEntry {
            type_name: type_name.into(),
            code: problem.code(),
            severity: problem.severity(),
            reason: problem.to_string(),
        };
        match entry.severity {
            Severity::Skipped => tracing::warn!(
                type_name = %entry.type_name,
                code = %entry.code,
                reason = %entry.reason,
                "type skipped"
            ),
            Severity::Fatal => tracing::error!(
                type_name = %entry.type_name,
                code = %entry.code,
                reason = %entry.reason,
                "type aborted"
            ),
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SkipEntry] {
        &self.entries
    }

    pub fn get(&self, type_name: &str) -> Option<&SkipEntry> {
        self.entries.iter().find(|e| e.type_name == type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkipEntry> {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Skipped)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &SkipEntry> {
        self.entries.iter().filter(|e| e.severity == Severity::Fatal)
    }

    pub fn has_fatal(&self) -> bool {
        self.fatal().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End-of-run report, one line per entry.
    pub fn render(&self) -> String {
        let fatal = self.fatal().count();
        let mut out = format!(
            "{} type(s) without bindings ({} skipped, {} fatal)",
            self.entries.len(),
            self.entries.len() - fatal,
            fatal
        );
        for entry in &self.entries {
            out.push_str(&format!(
                "\n[{}] {:<7} {}: {}",
                entry.code, entry.severity, entry.type_name, entry.reason
            ));
        }
        out
    }
}
