//! Entry HTML rendering.
//!
//! The entry HTML is a template with two functions:
//!
//! - `esbuild("app.js")` bundles a script (path relative to the entry HTML)
//!   and evaluates to the URL of its output, e.g. `/app.js`
//! - `livereload()` evaluates to the reload client in development and to
//!   nothing in production
//!
//! and one variable, `pkg`, holding the project's package.json.
//!
//! Rendering happens in two passes. The first pass only records which
//! entries the template asks for; those are bundled, and the second pass
//! renders the page with the resulting URLs.

use crate::dev::builder::{BuildOutput, Bundler, Mode};
use crate::error::{BuildError, Result, ResultExt};
use crate::pkgjson::PackageJson;
use minijinja::{context, Environment, Value};
use parking_lot::Mutex;
use sorvor_livereload::client;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// File name of the rendered page inside the output directory.
pub const INDEX_FILE: &str = "index.html";

/// What one render produced.
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    /// The written `index.html`
    pub index: PathBuf,
    /// One bundler result per `esbuild(...)` entry, in template order
    pub builds: Vec<BuildOutput>,
}

impl RenderOutput {
    /// All diagnostics from all entries.
    pub fn diagnostics(&self) -> Vec<String> {
        self.builds
            .iter()
            .flat_map(|build| build.diagnostics.iter().cloned())
            .collect()
    }

    /// Whether every entry bundled successfully.
    pub fn success(&self) -> bool {
        self.builds.iter().all(|build| build.success)
    }

    /// The page plus every bundled output.
    pub fn output_files(&self) -> Vec<PathBuf> {
        std::iter::once(self.index.clone())
            .chain(
                self.builds
                    .iter()
                    .flat_map(|build| build.output_files.iter().cloned()),
            )
            .collect()
    }
}

/// Renders the entry HTML into the output directory.
pub struct IndexRenderer {
    entry: PathBuf,
    out_dir: PathBuf,
    mode: Mode,
    bundler: Arc<dyn Bundler>,
    pkg: Option<PackageJson>,
}

impl IndexRenderer {
    pub fn new(entry: PathBuf, out_dir: PathBuf, mode: Mode, bundler: Arc<dyn Bundler>) -> Self {
        Self {
            entry,
            out_dir,
            mode,
            bundler,
            pkg: None,
        }
    }

    /// Expose a package.json to the template as `pkg`.
    pub fn with_package(mut self, pkg: Option<PackageJson>) -> Self {
        self.pkg = pkg;
        self
    }

    /// Render the entry and write `index.html`.
    ///
    /// Template errors and I/O failures are errors; bundler diagnostics are
    /// returned in the output.
    pub async fn render(&self) -> Result<RenderOutput> {
        let source = tokio::fs::read_to_string(&self.entry)
            .await
            .with_path(&self.entry)?;

        let entries = self.collect_entries(&source)?;
        let base = self.entry.parent().unwrap_or_else(|| Path::new("."));

        let mut urls = HashMap::new();
        let mut builds = Vec::with_capacity(entries.len());
        for entry in entries {
            let output = self.bundler.build(&[base.join(&entry)]).await?;
            if let Some(primary) = output.primary_output() {
                urls.insert(entry, self.url_for(primary));
            }
            builds.push(output);
        }

        let mut html = self.render_page(&source, urls)?;
        if self.mode == Mode::Development && !html.contains(client::SCRIPT.trim_end()) {
            html = client::inject_script(&html);
        }

        let index = self.out_dir.join(INDEX_FILE);
        tokio::fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|e| BuildError::WriteFailed {
                path: self.out_dir.clone(),
                reason: e.to_string(),
            })?;
        tokio::fs::write(&index, html)
            .await
            .map_err(|e| BuildError::WriteFailed {
                path: index.clone(),
                reason: e.to_string(),
            })?;

        Ok(RenderOutput { index, builds })
    }

    /// First pass: which entries does the template bundle?
    fn collect_entries(&self, source: &str) -> Result<Vec<String>> {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));

        let mut env = Environment::new();
        let recorder = seen.clone();
        env.add_function("esbuild", move |entry: String| {
            let mut seen = recorder.lock();
            if !seen.contains(&entry) {
                seen.push(entry);
            }
            String::new()
        });
        env.add_function("livereload", || String::new());

        env.render_named_str(INDEX_FILE, source, context! { pkg => self.pkg })?;

        let entries = std::mem::take(&mut *seen.lock());
        Ok(entries)
    }

    /// Second pass: the page itself.
    fn render_page(&self, source: &str, urls: HashMap<String, String>) -> Result<String> {
        let mut env = Environment::new();
        env.add_function("esbuild", move |entry: String| {
            Value::from_safe_string(urls.get(&entry).cloned().unwrap_or_default())
        });

        let snippet = match self.mode {
            Mode::Development => client::script_tag(),
            Mode::Production => String::new(),
        };
        env.add_function("livereload", move || Value::from_safe_string(snippet.clone()));

        Ok(env.render_named_str(INDEX_FILE, source, context! { pkg => self.pkg })?)
    }

    /// URL under which the server exposes an output file.
    fn url_for(&self, output: &Path) -> String {
        let relative = output
            .strip_prefix(&self.out_dir)
            .unwrap_or_else(|_| Path::new(output.file_name().unwrap_or_default()));

        let mut url = String::new();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                url.push('/');
                url.push_str(&part.to_string_lossy());
            }
        }
        url
    }
}
