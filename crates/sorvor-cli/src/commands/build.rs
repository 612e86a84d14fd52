//! Build command implementation.
//!
//! `sorvor build` produces a production bundle: HTML entries are rendered
//! once without the reload client, anything else goes straight to the
//! bundler.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::{ConfigOverrides, SorvorConfig};
use crate::dev::{BuildOutput, Bundler, CommandBundler, IndexRenderer, Mode};
use crate::error::{BuildError, Result};
use crate::pkgjson::PackageJson;
use crate::ui;
use std::sync::Arc;
use std::time::Instant;

/// Execute the build command.
///
/// # Errors
///
/// Returns errors for invalid configuration, a missing entry or bundler,
/// template errors, and builds that reported failure.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let config = SorvorConfig::load(&ConfigOverrides::from(&args), args.cwd.as_deref())?;
    config.validate()?;

    let bundler: Arc<dyn Bundler> = Arc::new(CommandBundler::from_config(&config, Mode::Production));
    build(&config, bundler).await
}

/// Build `config.entry` with `bundler` in production mode.
pub async fn build(config: &SorvorConfig, bundler: Arc<dyn Bundler>) -> Result<()> {
    let start = Instant::now();
    let entry = config.entry_path();
    let out_dir = config.out_dir_path();
    utils::ensure_output_dir(&out_dir)?;

    ui::info(&format!("Building {}", config.entry.display()));

    let (builds, files) = if config.is_html_entry() {
        let pkg = PackageJson::load(&config.cwd)?;
        let rendered = IndexRenderer::new(entry.clone(), out_dir, Mode::Production, bundler)
            .with_package(pkg)
            .render()
            .await?;
        let files = rendered.output_files();
        (rendered.builds, files)
    } else {
        let output = bundler.build(std::slice::from_ref(&entry)).await?;
        let files = output.output_files.clone();
        (vec![output], files)
    };

    let diagnostics: Vec<String> = builds
        .iter()
        .flat_map(|build| build.diagnostics.iter().cloned())
        .collect();
    utils::report_diagnostics(&diagnostics);

    if builds.iter().any(|build| !build.success) {
        return Err(BuildError::Failed {
            entry: config.entry.display().to_string(),
            errors: builds.iter().map(BuildOutput::error_count).sum::<usize>().max(1),
        }
        .into());
    }

    ui::print_outputs(&utils::output_sizes(&files, &config.cwd), start.elapsed());
    ui::success(&format!(
        "Build completed in {}",
        ui::format_duration(start.elapsed())
    ));
    Ok(())
}
