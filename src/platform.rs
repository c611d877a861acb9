//! OS family detection and platform-specific cache locations
//!
//! The platform label is embedded verbatim in cache keys, so its spelling
//! is part of the cross-invocation contract.

use std::fmt;
use std::path::{Path, PathBuf};

/// OS family a job is running on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    /// Detect the platform from the build target
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Default coursier cache location under the given home directory
    ///
    /// Coursier keeps its artifact cache in three different places
    /// depending on the OS family.
    pub fn coursier_cache_path(&self, home: &Path) -> PathBuf {
        match self {
            Self::Linux => home.join(".cache").join("coursier"),
            Self::MacOs => home.join("Library").join("Caches").join("Coursier"),
            Self::Windows => home
                .join("AppData")
                .join("Local")
                .join("Coursier")
                .join("Cache"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
        };
        write!(f, "{}", label)
    }
}
