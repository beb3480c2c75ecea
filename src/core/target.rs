//! Build target definitions
//!
//! The set of targets is closed: every platform multibuild knows how to drive
//! is a variant of [`Target`]. Catalog membership is decided at runtime by
//! probing the environment, but the universe of candidates is fixed here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TargetError;

/// Platform family a target belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFamily {
    /// Microsoft Windows
    Windows,
    /// GNU/Linux desktop and server
    Linux,
    /// macOS
    Apple,
    /// WebAssembly
    Web,
    /// Android
    Android,
}

impl TargetFamily {
    /// File suffix of a built executable for this family
    pub fn executable_suffix(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Web => ".wasm",
            Self::Linux | Self::Apple | Self::Android => "",
        }
    }

    /// Lowercase family name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Apple => "apple",
            Self::Web => "web",
            Self::Android => "android",
        }
    }
}

impl fmt::Display for TargetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform/configuration combination that can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// 64-bit Windows (MSVC)
    Windows64,
    /// 32-bit Windows (MSVC)
    Windows32,
    /// Windows on ARM64 (MSVC)
    WindowsArm64,
    /// 64-bit Linux (glibc)
    Linux64,
    /// ARM64 Linux (glibc)
    LinuxArm64,
    /// Intel macOS
    MacOsX64,
    /// Apple Silicon macOS
    MacOsArm64,
    /// Freestanding WebAssembly
    Wasm32,
    /// ARM64 Android
    Android64,
}

impl Target {
    /// Every known target, in catalog iteration order
    pub const ALL: [Target; 9] = [
        Target::Windows64,
        Target::Windows32,
        Target::WindowsArm64,
        Target::Linux64,
        Target::LinuxArm64,
        Target::MacOsX64,
        Target::MacOsArm64,
        Target::Wasm32,
        Target::Android64,
    ];

    /// Stable identifier used on the command line and in persisted files
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Windows64 => "windows-x64",
            Self::Windows32 => "windows-x86",
            Self::WindowsArm64 => "windows-arm64",
            Self::Linux64 => "linux-x64",
            Self::LinuxArm64 => "linux-arm64",
            Self::MacOsX64 => "macos-x64",
            Self::MacOsArm64 => "macos-arm64",
            Self::Wasm32 => "wasm32",
            Self::Android64 => "android-arm64",
        }
    }

    /// Human-readable name for progress labels and output folders
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Windows64 => "Windows 64-bit",
            Self::Windows32 => "Windows 32-bit",
            Self::WindowsArm64 => "Windows ARM64",
            Self::Linux64 => "Linux 64-bit",
            Self::LinuxArm64 => "Linux ARM64",
            Self::MacOsX64 => "macOS Intel",
            Self::MacOsArm64 => "macOS Apple Silicon",
            Self::Wasm32 => "WebAssembly",
            Self::Android64 => "Android ARM64",
        }
    }

    /// Rust target triple handed to cargo
    pub fn triple(self) -> &'static str {
        match self {
            Self::Windows64 => "x86_64-pc-windows-msvc",
            Self::Windows32 => "i686-pc-windows-msvc",
            Self::WindowsArm64 => "aarch64-pc-windows-msvc",
            Self::Linux64 => "x86_64-unknown-linux-gnu",
            Self::LinuxArm64 => "aarch64-unknown-linux-gnu",
            Self::MacOsX64 => "x86_64-apple-darwin",
            Self::MacOsArm64 => "aarch64-apple-darwin",
            Self::Wasm32 => "wasm32-unknown-unknown",
            Self::Android64 => "aarch64-linux-android",
        }
    }

    /// Family used to resolve environment-switching semantics
    pub fn family(self) -> TargetFamily {
        match self {
            Self::Windows64 | Self::Windows32 | Self::WindowsArm64 => TargetFamily::Windows,
            Self::Linux64 | Self::LinuxArm64 => TargetFamily::Linux,
            Self::MacOsX64 | Self::MacOsArm64 => TargetFamily::Apple,
            Self::Wasm32 => TargetFamily::Web,
            Self::Android64 => TargetFamily::Android,
        }
    }

    /// Look a target up by its rustc triple
    pub fn from_triple(triple: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.triple() == triple)
    }
}

/// Display name for a raw identifier, falling back to the identifier itself
pub fn display_name(identifier: &str) -> String {
    identifier
        .parse::<Target>()
        .map_or_else(|_| identifier.to_string(), |t| t.display_name().to_string())
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.identifier().eq_ignore_ascii_case(needle) || t.triple() == needle)
            .ok_or_else(|| TargetError::Unknown {
                input: s.to_string(),
            })
    }
}

impl Serialize for Target {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
