//! Static catalog of supported package managers
//!
//! Maps each package manager to the filesystem locations that make up its
//! dependency cache and to the default glob patterns whose matched file
//! contents drive the cache key. The catalog is the single source of truth
//! for both; nothing else decides what gets cached or fingerprinted.

use crate::error::{StashError, StashResult};
use crate::platform::Platform;
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Maven,
    Gradle,
    Sbt,
}

impl PackageManager {
    /// Parse a caller-supplied identity
    pub fn from_id(id: &str) -> StashResult<Self> {
        match id {
            "maven" => Ok(Self::Maven),
            "gradle" => Ok(Self::Gradle),
            "sbt" => Ok(Self::Sbt),
            other => Err(StashError::UnsupportedPackageManager(other.to_string())),
        }
    }

    /// Default glob patterns for dependency-declaration files
    pub fn default_patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Maven => &["**/pom.xml"],
            Self::Gradle => &[
                "**/*.gradle*",
                "**/gradle-wrapper.properties",
                "buildSrc/**/Versions.kt",
                "buildSrc/**/Dependencies.kt",
                "gradle/*.versions.toml",
                "**/versions.properties",
            ],
            Self::Sbt => &[
                "**/*.sbt",
                "**/project/build.properties",
                "**/project/**/*.scala",
                "**/project/**/*.sbt",
            ],
        }
    }

    /// Cache-root paths for this package manager
    ///
    /// Entries starting with `!` are exclusions: the path is inside an
    /// included root but must not be cached (lock files and per-resolution
    /// metadata that churn without affecting correctness).
    fn cache_paths(&self, platform: Platform, home: &Path) -> Vec<String> {
        let p = |path: PathBuf| path.display().to_string();
        match self {
            Self::Maven => vec![p(home.join(".m2").join("repository"))],
            Self::Gradle => vec![
                p(home.join(".gradle").join("caches")),
                p(home.join(".gradle").join("wrapper")),
            ],
            Self::Sbt => vec![
                p(home.join(".ivy2").join("cache")),
                p(home.join(".sbt")),
                p(platform.coursier_cache_path(home)),
                format!("!{}", p(home.join(".sbt").join("*.lock"))),
                format!("!{}", p(home.join("**").join("ivydata-*.properties"))),
            ],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Self::Maven => "maven",
            Self::Gradle => "gradle",
            Self::Sbt => "sbt",
        };
        write!(f, "{}", id)
    }
}

/// Everything the coordinators need to know about one package manager
#[derive(Debug, Clone)]
pub struct PackageManagerDescriptor {
    /// The package manager identity
    pub manager: PackageManager,
    /// Ordered cache-root paths; `!`-prefixed entries are exclusions
    pub cache_paths: Vec<String>,
    /// Ordered default fingerprint patterns
    pub default_patterns: Vec<String>,
}

/// Look up the descriptor for a package manager identity
///
/// Fails with `UnsupportedPackageManager` for anything outside the
/// closed set.
pub fn lookup(id: &str, platform: Platform) -> StashResult<PackageManagerDescriptor> {
    let home = dirs::home_dir().ok_or(StashError::HomeDirUnavailable)?;
    lookup_in_home(id, platform, &home)
}

/// Look up a descriptor with an explicit home directory
pub fn lookup_in_home(
    id: &str,
    platform: Platform,
    home: &Path,
) -> StashResult<PackageManagerDescriptor> {
    let manager = PackageManager::from_id(id)?;
    Ok(PackageManagerDescriptor {
        manager,
        cache_paths: manager.cache_paths(platform, home),
        default_patterns: manager
            .default_patterns()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}
