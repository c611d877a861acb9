//! Cache key derivation
//!
//! A primary key fingerprints the dependency-declaration files of the
//! current checkout: `<prefix>-<platform>-<id>-<contentHash>`. The fallback
//! key drops the content hash so a restore can still land on the most
//! recent cache for the same platform and package manager. The primary key
//! is deliberately never used as a prefix: once the declared dependencies
//! change, the job starts from the freshest coarse match and re-saves.

use crate::error::{StashError, StashResult};
use crate::hashing::FileHasher;
use crate::platform::Platform;
use crate::registry::PackageManagerDescriptor;
use std::path::Path;
use tracing::debug;

/// Constant prefix embedded in every cache key
pub const CACHE_KEY_PREFIX: &str = "depstash";

/// Resolve the effective fingerprint patterns
///
/// A non-blank override entirely replaces the descriptor defaults. The
/// override is newline-delimited; entries are trimmed and blanks dropped.
pub fn effective_patterns(
    descriptor: &PackageManagerDescriptor,
    override_pattern: Option<&str>,
) -> Vec<String> {
    match override_pattern.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        _ => descriptor.default_patterns.clone(),
    }
}

/// Compute the primary cache key for a package manager
///
/// Fails with `NoMatchingFiles` when the effective patterns match nothing
/// under `work_dir`; an empty hash is never embedded in a key.
pub async fn compute_key(
    descriptor: &PackageManagerDescriptor,
    platform: Platform,
    override_pattern: Option<&str>,
    work_dir: &Path,
    hasher: &dyn FileHasher,
) -> StashResult<String> {
    let patterns = effective_patterns(descriptor, override_pattern);
    debug!("fingerprint patterns: {:?}", patterns);

    let hash = hasher
        .hash(&patterns)
        .await?
        .ok_or_else(|| StashError::no_matching_files(work_dir, &patterns))?;

    Ok(format!(
        "{}-{}-{}-{}",
        CACHE_KEY_PREFIX, platform, descriptor.manager, hash
    ))
}

/// The coarse fallback key: platform + package manager, no content hash
pub fn fallback_key(descriptor: &PackageManagerDescriptor, platform: Platform) -> String {
    format!("{}-{}-{}", CACHE_KEY_PREFIX, platform, descriptor.manager)
}
