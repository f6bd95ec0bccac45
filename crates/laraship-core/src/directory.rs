//! Immutable, content-addressed directory snapshots.
//!
//! A [`Directory`] is how every file tree moves through the pipeline: the
//! application source, the Composer `vendor/` bundle and the compiled
//! front-end assets. The snapshot fixes the file list at creation time and
//! carries a SHA-256 digest over every `(relative path, bytes)` pair, so two
//! snapshots of identical trees compare equal regardless of where they live.

use crate::{Error, Result};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
    entries: Arc<[PathBuf]>,
    digest: String,
}

impl Directory {
    /// Snapshot the regular files under `root`, skipping `ignore` patterns.
    ///
    /// Patterns are gitignore-style globs anchored at `root`, so `vendor*`
    /// drops `./vendor` but keeps `resources/js/vendor.js`. No other filter
    /// applies: hidden files such as `.env.example` are part of the snapshot.
    ///
    /// Symbolic links are kept as links and never followed. A link to a
    /// directory (Laravel's `public/storage`) is a single entry, and its
    /// digest contribution is the link target rather than the target's
    /// contents.
    pub fn snapshot(root: &Path, ignore: &[String]) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::SourceMissing {
                path: root.to_path_buf(),
            });
        }

        let mut overrides = OverrideBuilder::new(root);
        for pattern in ignore {
            overrides
                .add(&format!("!{}", anchor(pattern)))
                .map_err(|e| Error::InvalidIgnore {
                    pattern: pattern.clone(),
                    source: e,
                })?;
        }
        let overrides = overrides.build().map_err(|e| Error::InvalidIgnore {
            pattern: ignore.join(", "),
            source: e,
        })?;

        let mut entries = Vec::new();
        for result in WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .overrides(overrides)
            .build()
        {
            let entry = result.map_err(|e| Error::SourceWalk {
                path: root.to_path_buf(),
                source: e,
            })?;
            if !entry
                .file_type()
                .is_some_and(|t| t.is_file() || t.is_symlink())
            {
                continue;
            }
            match entry.path().strip_prefix(root) {
                Ok(relative) => entries.push(relative.to_path_buf()),
                Err(e) => tracing::warn!(path = %entry.path().display(), "skipping entry: {e}"),
            }
        }
        entries.sort();

        let digest = digest_files(root, &entries)?;
        tracing::debug!(
            root = %root.display(),
            files = entries.len(),
            digest = %digest,
            "directory snapshot"
        );

        Ok(Self {
            root: root.to_path_buf(),
            entries: entries.into(),
            digest,
        })
    }

    /// Host directory the snapshot was taken from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Included files, relative to [`root`](Self::root), sorted.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Hex SHA-256 over the snapshot's paths and contents.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// First 12 hex characters of the digest.
    pub fn short_digest(&self) -> &str {
        &self.digest[..12]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Directory {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest
    }
}

impl Eq for Directory {}

fn anchor(pattern: &str) -> String {
    if pattern.starts_with('/') {
        pattern.to_owned()
    } else {
        format!("/{pattern}")
    }
}

fn digest_files(root: &Path, entries: &[PathBuf]) -> Result<String> {
    let mut hasher = Sha256::new();
    for relative in entries {
        let path = root.join(relative);
        let metadata =
            std::fs::symlink_metadata(&path).map_err(|e| Error::SourceRead {
                path: path.clone(),
                source: e,
            })?;
        hasher.update(relative.to_string_lossy().as_bytes());
        if metadata.file_type().is_symlink() {
            let target = std::fs::read_link(&path).map_err(|e| Error::SourceRead { path, source: e })?;
            let target = target.to_string_lossy();
            hasher.update([1u8]);
            hasher.update((target.len() as u64).to_le_bytes());
            hasher.update(target.as_bytes());
        } else {
            let bytes = std::fs::read(&path).map_err(|e| Error::SourceRead { path, source: e })?;
            hasher.update([0u8]);
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(&bytes);
        }
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::anchor;

    #[test]
    fn anchor_prefixes_relative_patterns() {
        assert_eq!(anchor("vendor*"), "/vendor*");
    }

    #[test]
    fn anchor_keeps_rooted_patterns() {
        assert_eq!(anchor("/node_modules*"), "/node_modules*");
    }
}
