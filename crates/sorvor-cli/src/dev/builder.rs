//! The bundler boundary.
//!
//! Compiling sources is not sorvor's job: it hands entry points to a
//! [`Bundler`] and reacts to what comes back. The default implementation runs
//! an esbuild-compatible program as a child process.

use crate::config::SorvorConfig;
use crate::error::{BuildError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Build flavor; decides `process.env.NODE_ENV` and whether the reload
/// client ends up in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Value substituted for `process.env.NODE_ENV`.
    pub fn node_env(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

/// Result of one bundler invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    /// Files written, in entry order
    pub output_files: Vec<PathBuf>,
    /// Human-readable errors and warnings
    pub diagnostics: Vec<String>,
    /// Whether the bundler reported success
    pub success: bool,
}

impl BuildOutput {
    /// The file a browser or node should load: the first script output,
    /// falling back to the first output of any kind.
    pub fn primary_output(&self) -> Option<&Path> {
        self.output_files
            .iter()
            .find(|path| path.extension().is_some_and(|ext| ext == "js"))
            .or_else(|| self.output_files.first())
            .map(PathBuf::as_path)
    }

    /// Number of diagnostics that are errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.starts_with("[ERROR]"))
            .count()
    }
}

/// Something that turns entry points into output files.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Bundle `entry_points`.
    ///
    /// A build that ran and failed is `Ok` with `success == false`; `Err` means
    /// the bundler could not be invoked at all.
    async fn build(&self, entry_points: &[PathBuf]) -> Result<BuildOutput>;
}

/// Runs an esbuild-compatible program.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    program: String,
    args: Vec<String>,
    out_dir: PathBuf,
    cwd: PathBuf,
    mode: Mode,
}

impl CommandBundler {
    /// Create a bundler writing into `out_dir`.
    pub fn new(program: impl Into<String>, out_dir: PathBuf, mode: Mode) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: PathBuf::from("."),
            out_dir,
            mode,
        }
    }

    /// Bundler set up from the resolved configuration.
    pub fn from_config(config: &SorvorConfig, mode: Mode) -> Self {
        Self::new(config.bundler.clone(), config.out_dir_path(), mode)
            .with_args(config.bundler_args.clone())
            .with_cwd(config.cwd.clone())
    }

    /// Extra arguments appended after the generated ones.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Directory the bundler runs in.
    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = cwd;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Full argument list for one invocation.
    pub fn command_args(&self, entry_points: &[PathBuf]) -> Vec<String> {
        let mut args: Vec<String> = entry_points
            .iter()
            .map(|entry| entry.display().to_string())
            .collect();

        args.push("--bundle".to_string());
        args.push(format!("--outdir={}", self.out_dir.display()));
        if !self.args.iter().any(|arg| arg.starts_with("--format")) {
            args.push("--format=esm".to_string());
        }
        args.push(format!(
            "--define:process.env.NODE_ENV=\"{}\"",
            self.mode.node_env()
        ));
        args.extend(self.args.iter().cloned());
        args
    }

    /// Program to execute: a project-local `node_modules/.bin` copy wins
    /// over one on `PATH`.
    fn resolve_program(&self) -> PathBuf {
        let program = Path::new(&self.program);
        if program.components().count() == 1 {
            let local = self.cwd.join("node_modules").join(".bin").join(program);
            if local.is_file() {
                return local;
            }
        }
        program.to_path_buf()
    }

    /// Output file the bundler writes for `entry`.
    fn predicted_output(&self, entry: &Path) -> Option<PathBuf> {
        let stem = entry.file_stem()?;
        let ext = match entry.extension().and_then(|ext| ext.to_str()) {
            Some("css") => "css",
            _ => "js",
        };
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(ext);
        Some(self.out_dir.join(name))
    }
}

#[async_trait]
impl Bundler for CommandBundler {
    async fn build(&self, entry_points: &[PathBuf]) -> Result<BuildOutput> {
        let program = self.resolve_program();
        let start = Instant::now();

        let output = Command::new(&program)
            .args(self.command_args(entry_points))
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| BuildError::BundlerUnavailable {
                program: program.display().to_string(),
                reason: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let success = output.status.success();
        let mut diagnostics = parse_diagnostics(&stderr);
        if !success && diagnostics.is_empty() && !stderr.trim().is_empty() {
            diagnostics.push(format!("[ERROR] {}", stderr.trim()));
        }

        let output_files = entry_points
            .iter()
            .filter_map(|entry| self.predicted_output(entry))
            .filter(|path| path.is_file())
            .collect();

        tracing::debug!(
            program = %program.display(),
            entries = entry_points.len(),
            success,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "bundler finished"
        );

        Ok(BuildOutput {
            output_files,
            diagnostics,
            success,
        })
    }
}

/// Pick `[ERROR]` and `[WARNING]` lines out of esbuild-style output.
///
/// The location line that follows a message (`    src/app.js:3:7:`) is
/// appended to it.
pub fn parse_diagnostics(stderr: &str) -> Vec<String> {
    let lines: Vec<&str> = stderr.lines().collect();
    let mut diagnostics = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(start) = line.find("[ERROR]").or_else(|| line.find("[WARNING]")) else {
            continue;
        };
        let mut message = line[start..].trim_end().to_string();

        let location = lines[i + 1..]
            .iter()
            .map(|next| next.trim())
            .find(|next| !next.is_empty())
            .filter(|next| is_location(next));
        if let Some(location) = location {
            message.push_str(" (");
            message.push_str(location.trim_end_matches(':'));
            message.push(')');
        }

        diagnostics.push(message);
    }

    diagnostics
}

fn is_location(line: &str) -> bool {
    line.ends_with(':')
        && !line.contains(' ')
        && line.trim_end_matches(':').contains(':')
}
