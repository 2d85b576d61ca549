//! Live index of a source tree for transcript matching.
//!
//! Maintains four insertion-ordered maps over a session root: file name keys,
//! folder names, component declarations, and function declarations. Uses
//! tree-sitter for symbol extraction, the `ignore` crate for enumeration, and
//! `notify` for live filesystem updates.

pub mod extractor;
pub mod store;
pub mod walker;
pub mod watcher;

use std::path::Path;

pub use store::{ArtifactIndex, IndexStats, SymbolEntry};
pub use walker::WalkOptions;
pub use watcher::TreeWatcher;

use voxmap_core::Result;

/// Enumerates the tree at `root` and builds a fully initialized index.
///
/// This is the one-shot path without a watcher; long-lived callers that need
/// live updates wrap the index in a lock and attach a [`TreeWatcher`].
///
/// # Errors
///
/// Returns an error if `root` cannot be enumerated. Per-file symbol
/// extraction failures are logged and skipped.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use voxmap_index::{build_index, WalkOptions};
///
/// let index = build_index(Path::new("."), WalkOptions::default()).unwrap();
/// println!("{} folders", index.stats().folders);
/// ```
pub fn build_index(root: &Path, options: WalkOptions) -> Result<ArtifactIndex> {
    let files = walker::enumerate_tree(root, &options)?;
    let mut index = ArtifactIndex::with_options(root, options);
    index.initialize(&files);
    Ok(index)
}
