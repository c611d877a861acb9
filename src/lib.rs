//! depstash - dependency cache keying, restore and save for CI jobs
//!
//! Computes a deterministic fingerprint of a project's
//! dependency-declaration files, restores a previously stored cache under
//! that key, and later decides whether the cache changed enough to warrant
//! re-upload. The two phases share no memory and communicate only through
//! a persisted key-value state file.

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod hashing;
pub mod key;
pub mod platform;
pub mod registry;
pub mod state;
pub mod store;

pub use error::{StashError, StashResult};
