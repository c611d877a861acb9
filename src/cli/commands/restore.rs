//! `depstash restore` - restore phase of a job

use crate::cli::args::RestoreArgs;
use crate::cli::commands::Settings;
use crate::coordinator::RestoreCoordinator;
use crate::error::StashResult;
use crate::hashing::GlobHasher;
use crate::state::FileStateStore;
use crate::store::LocalStore;

pub async fn restore(args: RestoreArgs, settings: &Settings) -> StashResult<()> {
    let hasher = GlobHasher::new(&settings.work_dir);
    let store = LocalStore::new(&settings.store_dir);
    let state = FileStateStore::new(&settings.state_file);

    let coordinator = RestoreCoordinator::new(
        settings.platform,
        &settings.work_dir,
        &hasher,
        &store,
        &state,
    );

    let outcome = coordinator
        .restore(
            &args.package_manager,
            args.dependency_path.as_deref(),
            !args.resolve_only,
        )
        .await?;

    // Machine-readable signal for downstream job steps
    println!("cache-hit={}", outcome.cache_hit);
    Ok(())
}
