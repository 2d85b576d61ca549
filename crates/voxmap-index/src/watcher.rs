use std::sync::mpsc;
use std::sync::{Arc, PoisonError, RwLock};

use glob::Pattern;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use voxmap_core::{Result, VoxmapError};

use crate::store::ArtifactIndex;
use crate::walker;

/// Watches the index root and applies filesystem events to the shared index.
///
/// Every event is applied individually, in arrival order, with no coalescing
/// or debouncing. The watcher handle must stay alive for the subscription to
/// stay active; dropping it ends the apply thread.
pub struct TreeWatcher {
    _watcher: RecommendedWatcher,
}

/// How one event path is applied to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeOp {
    Create,
    Delete,
    Change,
    /// Rename or ambiguous event: resolved by checking whether the path
    /// still exists.
    Sync,
}

impl TreeWatcher {
    /// Starts watching the index root recursively.
    ///
    /// # Errors
    ///
    /// Returns [`VoxmapError::Watch`] if the platform watcher cannot be
    /// created or the root cannot be watched.
    pub fn spawn(index: Arc<RwLock<ArtifactIndex>>) -> Result<Self> {
        let (root, options) = {
            let guard = index.read().unwrap_or_else(PoisonError::into_inner);
            (guard.root().to_path_buf(), guard.walk_options().clone())
        };

        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| match result {
                Ok(event) => {
                    let _ = tx.send(event);
                }
                Err(e) => tracing::warn!("watch error: {e}"),
            },
            Config::default(),
        )
        .map_err(|e| VoxmapError::Watch(e.to_string()))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| VoxmapError::Watch(e.to_string()))?;
        tracing::debug!("watching {}", root.display());

        let excludes = walker::compile_excludes(&options.excludes);
        std::thread::spawn(move || {
            while let Ok(event) = rx.recv() {
                apply_event(&index, &event, &excludes);
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

fn apply_event(index: &Arc<RwLock<ArtifactIndex>>, event: &Event, excludes: &[Pattern]) {
    let Some(op) = classify(&event.kind) else {
        return;
    };
    for path in &event.paths {
        if !walker::is_tracked(path) || walker::is_excluded(path, excludes) {
            continue;
        }
        let op = match op {
            TreeOp::Sync => {
                if path.exists() {
                    TreeOp::Create
                } else {
                    TreeOp::Delete
                }
            }
            other => other,
        };
        let mut guard = index.write().unwrap_or_else(PoisonError::into_inner);
        match op {
            TreeOp::Create => guard.handle_create(path),
            TreeOp::Delete => guard.handle_delete(path),
            TreeOp::Change => guard.handle_change(path),
            TreeOp::Sync => unreachable!("sync resolved above"),
        }
        tracing::debug!("applied {:?} for {}", op, path.display());
    }
}

fn classify(kind: &EventKind) -> Option<TreeOp> {
    match kind {
        EventKind::Create(_) => Some(TreeOp::Create),
        EventKind::Remove(_) => Some(TreeOp::Delete),
        EventKind::Modify(ModifyKind::Name(_)) => Some(TreeOp::Sync),
        EventKind::Modify(_) => Some(TreeOp::Change),
        EventKind::Any => Some(TreeOp::Sync),
        _ => None,
    }
}
