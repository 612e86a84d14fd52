//! Development command implementation.
//!
//! With an HTML entry, `sorvor dev`:
//! - renders the entry and bundles the scripts it references
//! - serves the output directory with SPA fallback and a live-reload stream
//! - re-renders on every burst of file changes and reloads connected browsers
//! - shuts down gracefully on Ctrl+C
//!
//! Any other entry is bundled and run with node, restarting on each change.

use crate::cli::DevArgs;
use crate::commands::utils;
use crate::config::{find_available_port, ConfigOverrides, SorvorConfig};
use crate::dev::server::{self, DevState};
use crate::dev::{
    Bundler, CommandBundler, DevLoop, FileChange, FileWatcher, IndexRenderer, Mode, NodePipeline,
    Pipeline, ReloadPipeline,
};
use crate::error::{CliError, Result};
use crate::pkgjson::PackageJson;
use crate::ui;
use sorvor_livereload::{Broadcaster, BroadcasterOptions};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::{mpsc, oneshot};

/// Execute the dev command.
///
/// # Errors
///
/// Returns errors for invalid configuration, template errors in the entry,
/// a watcher that cannot start, and a server that cannot bind.
pub async fn execute(args: DevArgs) -> Result<()> {
    let config = SorvorConfig::load(&ConfigOverrides::from(&args), args.cwd.as_deref())?;
    config.validate()?;
    utils::ensure_output_dir(&config.out_dir_path())?;

    ui::info(&format!("Entry point: {}", config.entry.display()));
    ui::info(&format!("Working directory: {}", config.cwd.display()));

    let bundler: Arc<dyn Bundler> =
        Arc::new(CommandBundler::from_config(&config, Mode::Development));

    if config.is_html_entry() {
        serve(&config, bundler).await
    } else {
        run(&config, bundler).await
    }
}

/// Serve mode.
async fn serve(config: &SorvorConfig, bundler: Arc<dyn Bundler>) -> Result<()> {
    let out_dir = config.out_dir_path();
    let pkg = PackageJson::load(&config.cwd)?;

    let broadcaster = Broadcaster::start(BroadcasterOptions {
        heartbeat: Some(config.heartbeat()),
        queue_capacity: config.queue_capacity,
    });

    let renderer = IndexRenderer::new(
        config.entry_path(),
        out_dir.clone(),
        Mode::Development,
        bundler,
    )
    .with_package(pkg);

    let start = Instant::now();
    let initial = renderer.render().await?;
    utils::report_diagnostics(&initial.diagnostics());
    ui::success(&format!(
        "Initial build completed in {}",
        ui::format_duration(start.elapsed())
    ));

    let (watcher, changes) = start_watcher(config)?;

    let addr = find_available_port(config.bind_ip()?, config.port)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;
    let url = config.server_url(addr.port());

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let state = DevState::new(broadcaster.clone(), out_dir);
    let mut server_handle = tokio::spawn(server::serve(listener, state, async move {
        let _ = shutdown_rx.await;
    }));

    ui::success(&format!("Development server running at {}", url));
    ui::info(&format!("Watching for changes in: {}", watcher.root().display()));
    if config.open {
        open_browser(&url);
    }
    ui::info("Press Ctrl+C to stop");

    let pipeline = Arc::new(ReloadPipeline::new(renderer, broadcaster.clone()));
    let dev_loop = DevLoop::new(pipeline, changes, config.debounce());

    let finished = tokio::select! {
        _ = dev_loop.run() => {
            ui::warning("File watcher stopped");
            None
        }
        _ = signal::ctrl_c() => {
            ui::info("Shutting down development server...");
            None
        }
        joined = &mut server_handle => Some(joined),
    };

    // Ends every live-reload stream so the server can drain.
    broadcaster.shutdown();
    let joined = match finished {
        Some(joined) => {
            ui::warning("Server task completed unexpectedly");
            joined
        }
        None => {
            let _ = shutdown_tx.send(());
            server_handle.await
        }
    };
    drop(watcher);

    joined.map_err(|e| CliError::Server(format!("Server task failed: {}", e)))??;
    ui::success("Development server stopped");
    Ok(())
}

/// Run mode.
async fn run(config: &SorvorConfig, bundler: Arc<dyn Bundler>) -> Result<()> {
    let pipeline = Arc::new(NodePipeline::new(bundler, config.entry_path()));

    let start = Instant::now();
    let diagnostics = pipeline.rebuild().await?;
    utils::report_diagnostics(&diagnostics);
    ui::success(&format!(
        "Initial build completed in {}",
        ui::format_duration(start.elapsed())
    ));
    pipeline.restart().await?;

    let (watcher, changes) = start_watcher(config)?;
    ui::info(&format!("Watching for changes in: {}", watcher.root().display()));
    ui::info("Press Ctrl+C to stop");

    let dev_loop = DevLoop::new(pipeline.clone(), changes, config.debounce());
    tokio::select! {
        _ = dev_loop.run() => ui::warning("File watcher stopped"),
        _ = signal::ctrl_c() => ui::info("Stopping..."),
    }

    pipeline.stop().await;
    drop(watcher);
    Ok(())
}

/// Watch the project, leaving out the build output.
fn start_watcher(config: &SorvorConfig) -> Result<(FileWatcher, mpsc::Receiver<FileChange>)> {
    FileWatcher::new(config.watch_root(), ignore_patterns(config))
}

/// Configured ignore patterns plus the output directory.
fn ignore_patterns(config: &SorvorConfig) -> Vec<String> {
    let mut ignore = config.watch_ignore.clone();
    if let Ok(relative) = config.out_dir_path().strip_prefix(config.watch_root()) {
        ignore.push(relative.to_string_lossy().into_owned());
    }
    ignore
}

/// Open the server URL in the default browser.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
