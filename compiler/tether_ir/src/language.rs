//! Target representations.

use std::fmt;

/// A representation a type can be named or converted in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodeLanguage {
    /// Native ABI layer.
    C,
    /// Kotlin declarations over JNA, the native-call layer for Kotlin.
    KotlinJna,
    Kotlin,
    Swift,
}

impl CodeLanguage {
    pub const ALL: [CodeLanguage; 4] = [
        CodeLanguage::C,
        CodeLanguage::KotlinJna,
        CodeLanguage::Kotlin,
        CodeLanguage::Swift,
    ];

    pub const fn is_host(self) -> bool {
        matches!(self, CodeLanguage::Kotlin | CodeLanguage::Swift)
    }
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodeLanguage::C => "C",
            CodeLanguage::KotlinJna => "KotlinJNA",
            CodeLanguage::Kotlin => "Kotlin",
            CodeLanguage::Swift => "Swift",
        })
    }
}

/// A host surface bindings are generated for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostLanguage {
    #[default]
    Kotlin,
    Swift,
}

impl HostLanguage {
    pub const ALL: [HostLanguage; 2] = [HostLanguage::Kotlin, HostLanguage::Swift];

    /// The host surface representation.
    pub const fn language(self) -> CodeLanguage {
        match self {
            HostLanguage::Kotlin => CodeLanguage::Kotlin,
            HostLanguage::Swift => CodeLanguage::Swift,
        }
    }

    /// The layer the host uses to reach native entry points.
    pub const fn native_call_language(self) -> CodeLanguage {
        match self {
            HostLanguage::Kotlin => CodeLanguage::KotlinJna,
            HostLanguage::Swift => CodeLanguage::C,
        }
    }
}

impl fmt::Display for HostLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.language().fmt(f)
    }
}
