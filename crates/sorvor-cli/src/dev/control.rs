//! Watch, rebuild, notify.
//!
//! [`DevLoop`] waits for a burst of file changes, asks its [`Pipeline`] to
//! rebuild, reports diagnostics, and tells the pipeline the rebuild happened.
//! Build problems are never fatal: the loop keeps going until the watcher
//! goes away.

use crate::dev::index::IndexRenderer;
use crate::dev::watcher::{next_batch, FileChange};
use crate::error::Result;
use crate::ui;
use async_trait::async_trait;
use sorvor_livereload::Broadcaster;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// What happens on each rebuild.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Rebuild everything, returning diagnostics.
    async fn rebuild(&self) -> Result<Vec<String>>;

    /// Called after every rebuild attempt, successful or not.
    async fn rebuilt(&self, diagnostics: &[String]);
}

/// The watch-build-notify loop.
pub struct DevLoop {
    pipeline: Arc<dyn Pipeline>,
    changes: mpsc::Receiver<FileChange>,
    debounce: Duration,
}

impl DevLoop {
    pub fn new(
        pipeline: Arc<dyn Pipeline>,
        changes: mpsc::Receiver<FileChange>,
        debounce: Duration,
    ) -> Self {
        Self {
            pipeline,
            changes,
            debounce,
        }
    }

    /// Run until the change channel closes.
    pub async fn run(mut self) {
        while let Some(paths) = next_batch(&mut self.changes, self.debounce).await {
            for path in &paths {
                tracing::debug!(path = %path.display(), "changed");
            }
            self.cycle(paths.len()).await;
        }
        tracing::debug!("change channel closed, leaving dev loop");
    }

    /// One rebuild and notification.
    pub async fn cycle(&self, changed: usize) {
        let start = Instant::now();

        let diagnostics = match self.pipeline.rebuild().await {
            Ok(diagnostics) => {
                for diagnostic in &diagnostics {
                    ui::diagnostic(diagnostic);
                }
                diagnostics
            }
            Err(e) => {
                ui::error(&format!("Rebuild failed: {}", e));
                vec![e.to_string()]
            }
        };

        ui::info(&format!(
            "Rebuilt after {} change(s) in {}",
            changed,
            ui::format_duration(start.elapsed())
        ));

        self.pipeline.rebuilt(&diagnostics).await;
    }
}

/// Serve mode: re-render the page, then reload every browser.
pub struct ReloadPipeline {
    renderer: IndexRenderer,
    broadcaster: Broadcaster,
}

impl ReloadPipeline {
    pub fn new(renderer: IndexRenderer, broadcaster: Broadcaster) -> Self {
        Self {
            renderer,
            broadcaster,
        }
    }
}

#[async_trait]
impl Pipeline for ReloadPipeline {
    async fn rebuild(&self) -> Result<Vec<String>> {
        Ok(self.renderer.render().await?.diagnostics())
    }

    async fn rebuilt(&self, _diagnostics: &[String]) {
        // Browsers reload even after a failed build and show whatever is on disk.
        match self.broadcaster.reload().await {
            Ok(delivered) => tracing::debug!(delivered, "reload published"),
            Err(e) => tracing::warn!("Could not publish reload: {}", e),
        }
    }
}
