//! Run mode: bundle a script entry and keep it running under node.
//!
//! Each rebuild stops the previous process and starts a fresh one on the
//! new output. No HTTP server is involved.

use crate::dev::builder::Bundler;
use crate::dev::control::Pipeline;
use crate::error::{CliError, Result};
use crate::ui;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::{Child, Command};

/// Program used to run the bundled output.
pub const NODE: &str = "node";

/// Rebuilds a script entry and restarts it.
pub struct NodePipeline {
    bundler: Arc<dyn Bundler>,
    entry: PathBuf,
    program: String,
    output: Mutex<Option<PathBuf>>,
    child: tokio::sync::Mutex<Option<Child>>,
}

impl NodePipeline {
    pub fn new(bundler: Arc<dyn Bundler>, entry: PathBuf) -> Self {
        Self {
            bundler,
            entry,
            program: NODE.to_string(),
            output: Mutex::new(None),
            child: tokio::sync::Mutex::new(None),
        }
    }

    /// Run outputs with something other than `node`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Start the last good output, stopping whatever ran before.
    pub async fn restart(&self) -> Result<()> {
        let mut child = self.child.lock().await;
        if let Some(mut previous) = child.take() {
            if let Err(e) = previous.kill().await {
                tracing::debug!("previous process already gone: {}", e);
            }
        }

        let Some(output) = self.output.lock().clone() else {
            return Ok(());
        };

        let spawned = Command::new(&self.program)
            .arg(&output)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CliError::Custom(format!("Failed to start {} {}: {}", self.program, output.display(), e))
            })?;

        tracing::debug!(pid = spawned.id(), output = %output.display(), "started");
        *child = Some(spawned);
        Ok(())
    }

    /// Stop the running process, if any.
    pub async fn stop(&self) {
        if let Some(mut child) = self.child.lock().await.take() {
            let _ = child.kill().await;
        }
    }

    /// Whether a process is currently running.
    pub async fn is_running(&self) -> bool {
        match self.child.lock().await.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

#[async_trait]
impl Pipeline for NodePipeline {
    async fn rebuild(&self) -> Result<Vec<String>> {
        let output = self.bundler.build(std::slice::from_ref(&self.entry)).await?;
        if output.success {
            *self.output.lock() = output.primary_output().map(PathBuf::from);
        }
        Ok(output.diagnostics)
    }

    async fn rebuilt(&self, _diagnostics: &[String]) {
        if let Err(e) = self.restart().await {
            ui::error(&e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::builder::BuildOutput;

    struct FixedOutput(PathBuf, bool);

    #[async_trait]
    impl Bundler for FixedOutput {
        async fn build(&self, _entry_points: &[PathBuf]) -> Result<BuildOutput> {
            Ok(BuildOutput {
                output_files: vec![self.0.clone()],
                diagnostics: vec![],
                success: self.1,
            })
        }
    }

    #[tokio::test]
    async fn test_failed_build_starts_nothing() {
        let pipeline = NodePipeline::new(
            Arc::new(FixedOutput(PathBuf::from("dist/server.js"), false)),
            PathBuf::from("server.js"),
        );

        pipeline.rebuild().await.unwrap();
        pipeline.restart().await.unwrap();
        assert!(!pipeline.is_running().await);
    }

    #[tokio::test]
    async fn test_missing_runtime_is_error() {
        let pipeline = NodePipeline::new(
            Arc::new(FixedOutput(PathBuf::from("dist/server.js"), true)),
            PathBuf::from("server.js"),
        )
        .with_program("sorvor-test-no-such-runtime");

        pipeline.rebuild().await.unwrap();
        assert!(pipeline.restart().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_restart_replaces_process() {
        let pipeline = NodePipeline::new(
            Arc::new(FixedOutput(PathBuf::from("30"), true)),
            PathBuf::from("entry"),
        )
        .with_program("sleep");

        pipeline.rebuild().await.unwrap();
        pipeline.restart().await.unwrap();
        let first = pipeline.child.lock().await.as_ref().and_then(Child::id);

        pipeline.restart().await.unwrap();
        let second = pipeline.child.lock().await.as_ref().and_then(Child::id);

        assert!(first.is_some());
        assert_ne!(first, second);
        assert!(pipeline.is_running().await);

        pipeline.stop().await;
        assert!(!pipeline.is_running().await);
    }
}
