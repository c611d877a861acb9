//! `depstash save` - save phase of a job

use crate::cli::args::SaveArgs;
use crate::cli::commands::Settings;
use crate::coordinator::SaveCoordinator;
use crate::error::StashResult;
use crate::state::FileStateStore;
use crate::store::LocalStore;

pub async fn save(args: SaveArgs, settings: &Settings) -> StashResult<()> {
    let store = LocalStore::new(&settings.store_dir);
    let state = FileStateStore::new(&settings.state_file);

    let coordinator = SaveCoordinator::new(settings.platform, &store, &state);
    coordinator.save(&args.package_manager, args.force).await
}
