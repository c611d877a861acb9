//! Artifact store abstraction
//!
//! The coordinators talk to an external blob cache keyed by string. The
//! trait keeps failure classification structured: adapters translate their
//! backend's failure modes into `ReserveConflict`, `ArchiveFailure` or
//! `StoreFailure`, so the coordinators never sniff message strings.

pub mod local;

pub use local::LocalStore;

use crate::error::StashResult;
use async_trait::async_trait;

/// External blob cache keyed by string
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Restore the cache entry for `primary_key`, falling back to the most
    /// recent entry whose key starts with one of `fallback_keys`.
    ///
    /// Returns the key that was actually matched, or `None` on a miss.
    async fn restore(
        &self,
        paths: &[String],
        primary_key: &str,
        fallback_keys: &[String],
    ) -> StashResult<Option<String>>;

    /// Save the given paths under `key`.
    ///
    /// Fails with `ReserveConflict` when a concurrent writer already
    /// reserved the key, and `ArchiveFailure` when packaging the paths
    /// failed.
    async fn save(&self, paths: &[String], key: &str) -> StashResult<()>;
}
