//! Content fingerprinting over glob-matched files
//!
//! The hashing primitive is injected into the key computer as a trait so
//! tests can substitute a canned hasher. `GlobHasher` is the real
//! implementation: it walks the working tree, matches files against the
//! effective patterns and folds per-file SHA-256 digests into one stable
//! hex digest.

use crate::error::{StashError, StashResult};
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File-content hashing primitive
///
/// Returns `None` when zero files matched any pattern; the caller decides
/// whether that is an error.
#[async_trait]
pub trait FileHasher: Send + Sync {
    async fn hash(&self, patterns: &[String]) -> StashResult<Option<String>>;
}

/// Hashes files under a working directory matched by glob patterns
#[derive(Debug, Clone)]
pub struct GlobHasher {
    work_dir: PathBuf,
}

impl GlobHasher {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    fn build_matcher(patterns: &[String]) -> StashResult<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| StashError::PatternInvalid {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| StashError::PatternInvalid {
            pattern: patterns.join(","),
            reason: e.to_string(),
        })
    }

    /// Collect matched files relative to the work dir, sorted for determinism
    fn matched_files(&self, matcher: &GlobSet) -> StashResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.work_dir).follow_links(false) {
            let entry = entry.map_err(|e| {
                StashError::io(
                    format!("walking {}", self.work_dir.display()),
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk error")),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&self.work_dir)
                .unwrap_or(entry.path());
            if matcher.is_match(rel) {
                files.push(rel.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    fn hash_one(&self, rel: &Path) -> StashResult<[u8; 32]> {
        let path = self.work_dir.join(rel);
        let contents = fs::read(&path)
            .map_err(|e| StashError::io(format!("reading {}", path.display()), e))?;
        let mut hasher = Sha256::new();
        hasher.update(&contents);
        Ok(hasher.finalize().into())
    }
}

#[async_trait]
impl FileHasher for GlobHasher {
    async fn hash(&self, patterns: &[String]) -> StashResult<Option<String>> {
        let matcher = Self::build_matcher(patterns)?;
        let files = self.matched_files(&matcher)?;
        if files.is_empty() {
            debug!("no files matched {:?} under {}", patterns, self.work_dir.display());
            return Ok(None);
        }

        debug!("hashing {} matched files", files.len());
        let mut combined = Sha256::new();
        for rel in &files {
            let digest = self.hash_one(rel)?;
            combined.update(digest);
        }
        Ok(Some(hex::encode(combined.finalize())))
    }
}
