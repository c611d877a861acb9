//! Directory-backed artifact store
//!
//! A reference `ArtifactStore` for local use and integration tests: each
//! saved entry is a plain mirror of the cached paths under
//! `<root>/entries/<key>/`, listed in an index file with a creation
//! timestamp so fallback (prefix) lookups can pick the newest entry.
//! No compression, no tar.

use crate::error::{StashError, StashResult};
use crate::store::ArtifactStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One saved cache entry in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    key: String,
    created_at: DateTime<Utc>,
}

/// Per-entry manifest recording where each mirrored path came from
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    paths: Vec<String>,
}

/// Artifact store backed by a local directory tree
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn index_path(&self) -> PathBuf {
        self.root.join("index.json")
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.root.join("entries").join(key)
    }

    fn read_index(&self) -> StashResult<Vec<IndexEntry>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| StashError::io(format!("reading store index {}", path.display()), e))?;
        let entries = serde_json::from_str(&content)?;
        Ok(entries)
    }

    fn write_index(&self, entries: &[IndexEntry]) -> StashResult<()> {
        let path = self.index_path();
        fs::create_dir_all(&self.root)
            .map_err(|e| StashError::io("creating store root", e))?;
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&path, content)
            .map_err(|e| StashError::io(format!("writing store index {}", path.display()), e))
    }

    /// Exact match first, then newest entry per fallback prefix
    fn find_match(
        entries: &[IndexEntry],
        primary_key: &str,
        fallback_keys: &[String],
    ) -> Option<String> {
        if entries.iter().any(|e| e.key == primary_key) {
            return Some(primary_key.to_string());
        }
        for fallback in fallback_keys {
            let newest = entries
                .iter()
                .filter(|e| e.key.starts_with(fallback.as_str()))
                .max_by_key(|e| e.created_at);
            if let Some(entry) = newest {
                return Some(entry.key.clone());
            }
        }
        None
    }

    /// Split cache-path entries into included roots and exclusion globs
    fn split_paths(paths: &[String]) -> StashResult<(Vec<PathBuf>, GlobSet)> {
        let mut roots = Vec::new();
        let mut builder = GlobSetBuilder::new();
        for entry in paths {
            if let Some(negated) = entry.strip_prefix('!') {
                let glob = Glob::new(negated).map_err(|e| StashError::PatternInvalid {
                    pattern: entry.clone(),
                    reason: e.to_string(),
                })?;
                builder.add(glob);
            } else {
                roots.push(PathBuf::from(entry));
            }
        }
        let exclusions = builder.build().map_err(|e| StashError::PatternInvalid {
            pattern: paths.join(","),
            reason: e.to_string(),
        })?;
        Ok((roots, exclusions))
    }

    /// Mirror one directory tree, skipping excluded files
    fn copy_tree(src: &Path, dst: &Path, exclusions: &GlobSet) -> StashResult<()> {
        for entry in WalkDir::new(src).follow_links(false) {
            let entry = entry.map_err(|e| {
                StashError::ArchiveFailure(format!("walking {}: {}", src.display(), e))
            })?;
            if exclusions.is_match(entry.path()) {
                continue;
            }
            let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
            let target = dst.join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| {
                    StashError::ArchiveFailure(format!("creating {}: {}", target.display(), e))
                })?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| {
                        StashError::ArchiveFailure(format!("creating {}: {}", parent.display(), e))
                    })?;
                }
                fs::copy(entry.path(), &target).map_err(|e| {
                    StashError::ArchiveFailure(format!(
                        "copying {}: {}",
                        entry.path().display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for LocalStore {
    async fn restore(
        &self,
        _paths: &[String],
        primary_key: &str,
        fallback_keys: &[String],
    ) -> StashResult<Option<String>> {
        let entries = self.read_index()?;
        let Some(matched) = Self::find_match(&entries, primary_key, fallback_keys) else {
            return Ok(None);
        };

        let entry_dir = self.entry_dir(&matched);
        let manifest_path = entry_dir.join("manifest.json");
        let content = fs::read_to_string(&manifest_path).map_err(|e| {
            StashError::io(format!("reading manifest {}", manifest_path.display()), e)
        })?;
        let manifest: Manifest = serde_json::from_str(&content)?;

        let no_exclusions = GlobSetBuilder::new()
            .build()
            .map_err(|e| StashError::Internal(e.to_string()))?;
        for (i, original) in manifest.paths.iter().enumerate() {
            let src = entry_dir.join("data").join(i.to_string());
            if src.exists() {
                Self::copy_tree(&src, Path::new(original), &no_exclusions)?;
            }
        }

        debug!("restored entry {} from {}", matched, entry_dir.display());
        Ok(Some(matched))
    }

    async fn save(&self, paths: &[String], key: &str) -> StashResult<()> {
        let entries = self.read_index()?;
        if entries.iter().any(|e| e.key == key) {
            return Err(StashError::ReserveConflict(format!(
                "Unable to reserve cache with key {}, another job may be creating this cache.",
                key
            )));
        }

        let (roots, exclusions) = Self::split_paths(paths)?;
        let entry_dir = self.entry_dir(key);

        // Manifest order must line up with the data/<n> directories, so
        // missing roots are skipped before numbering.
        let mut saved_paths = Vec::new();
        for root in &roots {
            if !root.exists() {
                debug!("skipping missing cache path {}", root.display());
                continue;
            }
            let data_dir = entry_dir.join("data").join(saved_paths.len().to_string());
            Self::copy_tree(root, &data_dir, &exclusions)?;
            saved_paths.push(root.display().to_string());
        }

        fs::create_dir_all(&entry_dir)
            .map_err(|e| StashError::io("creating store entry", e))?;
        let manifest = Manifest { paths: saved_paths };
        fs::write(
            entry_dir.join("manifest.json"),
            serde_json::to_string_pretty(&manifest)?,
        )
        .map_err(|e| StashError::io("writing manifest", e))?;

        let mut entries = entries;
        entries.push(IndexEntry {
            key: key.to_string(),
            created_at: Utc::now(),
        });
        self.write_index(&entries)
    }
}
