use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use voxmap_core::{Result, TranscriptMatch, VoxmapConfig, VoxmapError};
use voxmap_index::{walker, ArtifactIndex, IndexStats, TreeWatcher, WalkOptions};

use crate::matcher::{self, MatchOptions};

/// A matching session over one root: the live index plus its watcher.
///
/// The session owns the lifecycle. `initialize` builds the index and starts
/// watching; `find_in_transcript` queries it; `switch_root` tears the old
/// index down before building the new one, so at most one watcher is ever
/// subscribed; `dispose` (or drop) stops watching.
pub struct Session {
    walk_options: WalkOptions,
    match_options: MatchOptions,
    state: Option<ActiveState>,
}

struct ActiveState {
    root: PathBuf,
    index: Arc<RwLock<ArtifactIndex>>,
    _watcher: TreeWatcher,
}

impl Session {
    /// Creates an idle session from configuration.
    pub fn new(config: &VoxmapConfig) -> Self {
        Self {
            walk_options: WalkOptions::from(&config.index),
            match_options: MatchOptions::from(&config.matching),
            state: None,
        }
    }

    /// Builds the index over `root` and starts watching for tree changes.
    ///
    /// Idempotent: an already-initialized session returns its current stats
    /// untouched. Fails if the root cannot be canonicalized or enumerated;
    /// the session is left uninitialized and a retry is safe. The watcher
    /// subscribes before the bulk enumeration so files created mid-scan are
    /// still picked up.
    pub fn initialize(&mut self, root: &Path) -> Result<IndexStats> {
        if let Some(state) = &self.state {
            let index = state.index.read().unwrap_or_else(PoisonError::into_inner);
            return Ok(index.stats());
        }

        let root = root.canonicalize()?;
        let index = Arc::new(RwLock::new(ArtifactIndex::with_options(
            &root,
            self.walk_options.clone(),
        )));
        let watcher = TreeWatcher::spawn(Arc::clone(&index))?;
        let files = walker::enumerate_tree(&root, &self.walk_options)?;

        let stats = {
            let mut guard = index.write().unwrap_or_else(PoisonError::into_inner);
            guard.initialize(&files);
            guard.stats()
        };
        tracing::info!(
            "indexed {} files under {}: {} components, {} functions",
            files.len(),
            root.display(),
            stats.components,
            stats.functions
        );

        self.state = Some(ActiveState {
            root,
            index,
            _watcher: watcher,
        });
        Ok(stats)
    }

    /// Resolves a transcript against the current index state.
    pub fn find_in_transcript(&self, transcript: &str) -> Result<TranscriptMatch> {
        let state = self.state.as_ref().ok_or(VoxmapError::NotInitialized)?;
        let index = state.index.read().unwrap_or_else(PoisonError::into_inner);
        Ok(matcher::find_in_transcript_with(
            &index,
            transcript,
            &self.match_options,
        ))
    }

    /// Disposes the current index, then initializes over the new root.
    ///
    /// Teardown is strict: the old watcher unsubscribes before the new
    /// index exists, so events never cross roots.
    pub fn switch_root(&mut self, root: &Path) -> Result<IndexStats> {
        self.dispose();
        self.initialize(root)
    }

    /// Stops watching and drops the index. Matching becomes unavailable
    /// until the next `initialize`.
    pub fn dispose(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::debug!("disposed session for {}", state.root.display());
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// The canonicalized root of the active index, if any.
    pub fn root(&self) -> Option<&Path> {
        self.state.as_ref().map(|state| state.root.as_path())
    }
}
