//! Command implementations

mod key;
mod restore;
mod save;

pub use key::key;
pub use restore::restore;
pub use save::save;

use crate::config::Config;
use crate::error::{StashError, StashResult};
use crate::platform::Platform;
use std::path::PathBuf;

/// Resolved runtime settings shared by all commands
pub struct Settings {
    pub platform: Platform,
    pub work_dir: PathBuf,
    pub state_file: PathBuf,
    pub store_dir: PathBuf,
}

impl Settings {
    /// Merge CLI overrides over the loaded configuration
    pub fn resolve(
        config: &Config,
        work_dir: Option<PathBuf>,
        state_file: Option<PathBuf>,
        store_dir: Option<PathBuf>,
    ) -> StashResult<Self> {
        let work_dir = match work_dir {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|e| StashError::io("getting current directory", e))?,
        };
        Ok(Self {
            platform: Platform::current(),
            work_dir,
            state_file: state_file.unwrap_or_else(|| config.state_file()),
            store_dir: store_dir.unwrap_or_else(|| config.store_dir()),
        })
    }
}
