//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// depstash - dependency cache keying, restore and save for CI jobs
///
/// Fingerprints a project's dependency-declaration files, restores the
/// matching cache early in a job, and re-saves it at the end only when the
/// fingerprint changed.
#[derive(Parser, Debug)]
#[command(name = "depstash")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DEPSTASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Working directory to fingerprint (defaults to current directory)
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Per-job state file shared between restore and save
    #[arg(long, global = true, env = "DEPSTASH_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Root directory of the local artifact store
    #[arg(long, global = true, env = "DEPSTASH_STORE_DIR")]
    pub store_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the cache key and restore the dependency cache
    Restore(RestoreArgs),

    /// Save the dependency cache unless it is already up to date
    Save(SaveArgs),

    /// Print the cache key for the current checkout and exit
    Key(KeyArgs),
}

/// Arguments for the restore command
#[derive(Parser, Debug)]
pub struct RestoreArgs {
    /// Package manager identity (maven, gradle, sbt)
    pub package_manager: String,

    /// Override glob patterns for fingerprinting, newline-delimited;
    /// replaces the built-in patterns entirely
    #[arg(long)]
    pub dependency_path: Option<String>,

    /// Compute and persist the key without restoring any artifacts
    #[arg(long)]
    pub resolve_only: bool,
}

/// Arguments for the save command
#[derive(Parser, Debug)]
pub struct SaveArgs {
    /// Package manager identity (maven, gradle, sbt)
    pub package_manager: String,

    /// Save even when the restore phase reported an exact hit
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the key command
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Package manager identity (maven, gradle, sbt)
    pub package_manager: String,

    /// Override glob patterns for fingerprinting, newline-delimited
    #[arg(long)]
    pub dependency_path: Option<String>,
}
