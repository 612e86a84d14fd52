//! Recursive file watcher for dev mode.
//!
//! Watches the project directory and forwards changes to relevant files,
//! skipping node_modules, the build output, hidden files and other
//! configured patterns. Bursts are collapsed by [`next_batch`].

use crate::error::{CliError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Capacity of the change queue between the notify thread and the loop.
const CHANGE_QUEUE: usize = 256;

/// A batch is flushed after at most this many windows, even if changes
/// keep arriving.
const MAX_BATCH_WINDOWS: u32 = 10;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_event(kind: &EventKind, path: &Path) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path.to_path_buf())),
            EventKind::Modify(_) => Some(FileChange::Modified(path.to_path_buf())),
            EventKind::Remove(_) => Some(FileChange::Removed(path.to_path_buf())),
            _ => None,
        }
    }
}

/// Watches a directory tree for the lifetime of the value.
#[derive(Debug)]
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root` recursively.
    ///
    /// `ignore_patterns` are directory names (`node_modules`) or extension
    /// globs (`*.log`), matched against the path relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns error if `root` does not exist or the platform watcher cannot
    /// be created.
    pub fn new(
        root: PathBuf,
        ignore_patterns: Vec<String>,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.is_dir() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(CHANGE_QUEUE);
        let filter_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "watch error");
                    return;
                }
            };

            for path in &event.paths {
                if Self::should_ignore(path, &filter_root, &ignore_patterns) {
                    continue;
                }
                let Some(change) = FileChange::from_event(&event.kind, path) else {
                    continue;
                };

                // Runs on notify's thread; a full queue already has a rebuild pending.
                match tx.try_send(change) {
                    Ok(()) => {}
                    Err(TrySendError::Full(change)) => {
                        tracing::trace!(path = %change.path().display(), "change queue full");
                    }
                    Err(TrySendError::Closed(_)) => return,
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching for changes");

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Whether a change to `path` should be skipped.
    fn should_ignore(path: &Path, root: &Path, ignore_patterns: &[String]) -> bool {
        let Ok(rel_path) = path.strip_prefix(root) else {
            return true;
        };

        let path_str = rel_path.to_string_lossy();
        for pattern in ignore_patterns {
            if let Some(ext) = pattern.strip_prefix('*') {
                if path_str.ends_with(ext) {
                    return true;
                }
            } else if rel_path.starts_with(pattern.trim_end_matches('/'))
                || rel_path
                    .components()
                    .any(|c| c.as_os_str() == pattern.trim_end_matches('/'))
            {
                return true;
            }
        }

        rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Wait for the next burst of changes.
///
/// Blocks until one change arrives, then keeps absorbing changes until
/// `window` passes without any. A steady stream of changes is cut off
/// `MAX_BATCH_WINDOWS` windows after the first one. Returns the changed
/// paths without duplicates, or `None` once the watcher is gone.
pub async fn next_batch(
    rx: &mut mpsc::Receiver<FileChange>,
    window: Duration,
) -> Option<Vec<PathBuf>> {
    let first = rx.recv().await?;
    let now = tokio::time::Instant::now();
    let deadline = now
        .checked_add(window.saturating_mul(MAX_BATCH_WINDOWS))
        .unwrap_or_else(|| now + Duration::from_secs(86_400));
    let mut paths = vec![first.path().to_path_buf()];

    loop {
        tokio::select! {
            biased;
            _ = tokio::time::sleep_until(deadline) => {
                tracing::debug!(changed = paths.len(), "changes still arriving, flushing batch");
                return Some(paths);
            }
            received = tokio::time::timeout(window, rx.recv()) => match received {
                Ok(Some(change)) => {
                    if !paths.iter().any(|p| p == change.path()) {
                        paths.push(change.path().to_path_buf());
                    }
                }
                // Quiet for a whole window, or the sender is gone: flush.
                Ok(None) | Err(_) => return Some(paths),
            },
        }
    }
}
