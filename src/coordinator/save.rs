//! Save phase
//!
//! Reads back the key persisted at restore time and decides whether
//! re-uploading the cache is worth it. A fallback (prefix) match during
//! restore is deliberately not equal to the primary key, so any
//! fallback-based restore leads to a save here.

use crate::error::{StashError, StashResult};
use crate::platform::Platform;
use crate::registry::{self, PackageManager};
use crate::state::{StateStore, STATE_CACHE_MATCHED_KEY, STATE_CACHE_PRIMARY_KEY};
use crate::store::ArtifactStore;
use tracing::{info, warn};

/// Orchestrates the save phase of a job
pub struct SaveCoordinator<'a> {
    platform: Platform,
    store: &'a dyn ArtifactStore,
    state: &'a dyn StateStore,
}

impl<'a> SaveCoordinator<'a> {
    pub fn new(
        platform: Platform,
        store: &'a dyn ArtifactStore,
        state: &'a dyn StateStore,
    ) -> Self {
        Self {
            platform,
            store,
            state,
        }
    }

    /// Run the save phase for one package manager
    pub async fn save(&self, id: &str, force_update: bool) -> StashResult<()> {
        let descriptor = registry::lookup(id, self.platform)?;

        let matched_key = self.state.get(STATE_CACHE_MATCHED_KEY).await?;
        let primary_key = self.state.get(STATE_CACHE_PRIMARY_KEY).await?;

        // Restore never ran (or failed before persisting). Saving under an
        // unverified identity is worse than skipping, so this holds even
        // when the save is forced.
        let Some(primary_key) = primary_key else {
            warn!("Error retrieving key from state.");
            return Ok(());
        };

        if !force_update && matched_key.as_deref() == Some(primary_key.as_str()) {
            info!(
                "Cache hit occurred on the primary key {}, not saving cache.",
                primary_key
            );
            return Ok(());
        }

        match self.store.save(&descriptor.cache_paths, &primary_key).await {
            Ok(()) => {
                info!("Cache saved with the key: {}", primary_key);
                Ok(())
            }
            // A concurrent job already wrote this key; its cache is as good
            // as ours would have been.
            Err(err) if err.is_reserve_conflict() => {
                info!("{}", err);
                Ok(())
            }
            Err(err @ StashError::ArchiveFailure(_))
                if descriptor.manager == PackageManager::Gradle
                    && self.platform == Platform::Windows =>
            {
                warn!(
                    "Failed to save Gradle cache on Windows. If tar failed because the \
                     Gradle daemon still holds files open, stop it with `./gradlew --stop` \
                     before the job ends."
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
