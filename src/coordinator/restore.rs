//! Restore phase
//!
//! Computes the primary key, persists it for the later save phase, and
//! optionally asks the artifact store to restore. The primary key is
//! persisted even when no restore is performed: the save phase still needs
//! to know what key to upload under.

use crate::error::StashResult;
use crate::hashing::FileHasher;
use crate::key::{compute_key, fallback_key};
use crate::platform::Platform;
use crate::registry;
use crate::state::{StateStore, STATE_CACHE_MATCHED_KEY, STATE_CACHE_PRIMARY_KEY};
use crate::store::ArtifactStore;
use std::path::PathBuf;
use tracing::{debug, info};

/// Result of the restore phase, the observable cache-hit signal
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    /// Key computed from the current file contents
    pub primary_key: String,
    /// Key the artifact store actually matched, if any
    pub matched_key: Option<String>,
    /// True only on an exact primary-key hit
    pub cache_hit: bool,
}

/// Orchestrates the restore phase of a job
pub struct RestoreCoordinator<'a> {
    platform: Platform,
    work_dir: PathBuf,
    hasher: &'a dyn FileHasher,
    store: &'a dyn ArtifactStore,
    state: &'a dyn StateStore,
}

impl<'a> RestoreCoordinator<'a> {
    pub fn new(
        platform: Platform,
        work_dir: impl Into<PathBuf>,
        hasher: &'a dyn FileHasher,
        store: &'a dyn ArtifactStore,
        state: &'a dyn StateStore,
    ) -> Self {
        Self {
            platform,
            work_dir: work_dir.into(),
            hasher,
            store,
            state,
        }
    }

    /// Run the restore phase for one package manager
    ///
    /// `UnsupportedPackageManager` and `NoMatchingFiles` abort the job; an
    /// incomplete checkout is a caller error, not a transient condition.
    pub async fn restore(
        &self,
        id: &str,
        override_pattern: Option<&str>,
        perform_restore: bool,
    ) -> StashResult<RestoreOutcome> {
        let descriptor = registry::lookup(id, self.platform)?;

        let primary_key = compute_key(
            &descriptor,
            self.platform,
            override_pattern,
            &self.work_dir,
            self.hasher,
        )
        .await?;
        debug!("primary key: {}", primary_key);

        // Persisted unconditionally so the save phase knows the key even
        // when the caller skipped the actual restore.
        self.state
            .set(STATE_CACHE_PRIMARY_KEY, &primary_key)
            .await?;

        if !perform_restore {
            debug!("restore skipped for {}", descriptor.manager);
            return Ok(RestoreOutcome {
                primary_key,
                matched_key: None,
                cache_hit: false,
            });
        }

        let fallback = fallback_key(&descriptor, self.platform);
        let matched = self
            .store
            .restore(&descriptor.cache_paths, &primary_key, &[fallback])
            .await?;

        match matched {
            Some(matched_key) => {
                self.state
                    .set(STATE_CACHE_MATCHED_KEY, &matched_key)
                    .await?;
                info!("Cache restored from key: {}", matched_key);
                let cache_hit = matched_key == primary_key;
                Ok(RestoreOutcome {
                    primary_key,
                    matched_key: Some(matched_key),
                    cache_hit,
                })
            }
            None => {
                info!("{} cache is not found for key {}", descriptor.manager, primary_key);
                Ok(RestoreOutcome {
                    primary_key,
                    matched_key: None,
                    cache_hit: false,
                })
            }
        }
    }
}
