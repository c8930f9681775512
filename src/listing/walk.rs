//! Recursive directory walk
//!
//! [`Walk`] lazily yields one [`Entry`] per descendant of a directory. Order is
//! lexical per level, depth first, with a directory yielded before its
//! children. The root itself is never yielded. Entries the walker cannot read
//! are logged and skipped; a file whose digest cannot be computed is still
//! yielded, just without a checksum.
//!
//! Only regular files are hashed. Symlinks, FIFOs, sockets and device nodes
//! are reported as files without a checksum: links are never followed out of
//! the root and opening a FIFO would block the walk.

use super::checksum::checksum;
use super::entry::{Entry, EntryKind};
use crate::logger;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Lazy iterator over the descendants of a directory
pub struct Walk {
    root: PathBuf,
    inner: walkdir::IntoIter,
    checksums: bool,
}

impl Walk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let inner = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self {
            root,
            inner,
            checksums: false,
        }
    }

    /// Compute a SHA-1 for every file yielded
    #[must_use]
    pub const fn with_checksums(mut self, enabled: bool) -> Self {
        self.checksums = enabled;
        self
    }

    fn to_entry(&self, item: &walkdir::DirEntry) -> Option<Entry> {
        let Some(name) = relative_name(&self.root, item.path()) else {
            logger::log_warning(&format!(
                "Skipping entry outside walked root: {}",
                item.path().display()
            ));
            return None;
        };

        if item.file_type().is_dir() {
            return Some(Entry {
                name,
                kind: EntryKind::Folder,
                checksum: None,
            });
        }

        // file_type() is from lstat, so a symlink is never is_file()
        let checksum = if self.checksums && item.file_type().is_file() {
            match checksum(item.path()) {
                Ok(digest) => Some(digest),
                Err(e) => {
                    logger::log_warning(&format!(
                        "Checksum unavailable for '{}': {e}",
                        item.path().display()
                    ));
                    None
                }
            }
        } else {
            None
        };

        Some(Entry {
            name,
            kind: EntryKind::File,
            checksum,
        })
    }
}

impl Iterator for Walk {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            match self.inner.next()? {
                Ok(item) => {
                    if let Some(entry) = self.to_entry(&item) {
                        return Some(entry);
                    }
                }
                Err(e) => {
                    logger::log_warning(&format!("Skipping unreadable entry: {e}"));
                }
            }
        }
    }
}

/// Convenience constructor for [`Walk`]
pub fn walk(root: impl Into<PathBuf>, checksums: bool) -> Walk {
    Walk::new(root).with_checksums(checksums)
}

/// `path` relative to `root`, joined with `/` regardless of platform
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
