//! `depstash key` - print the primary cache key without side effects

use crate::cli::args::KeyArgs;
use crate::cli::commands::Settings;
use crate::error::StashResult;
use crate::hashing::GlobHasher;
use crate::key::compute_key;
use crate::registry;

pub async fn key(args: KeyArgs, settings: &Settings) -> StashResult<()> {
    let descriptor = registry::lookup(&args.package_manager, settings.platform)?;
    let hasher = GlobHasher::new(&settings.work_dir);

    let key = compute_key(
        &descriptor,
        settings.platform,
        args.dependency_path.as_deref(),
        &settings.work_dir,
        &hasher,
    )
    .await?;

    println!("{}", key);
    Ok(())
}
