//! Development mode.
//!
//! - [`builder`]: the external bundler boundary
//! - [`index`]: entry HTML rendering
//! - [`watcher`]: recursive file watching and burst collapsing
//! - [`control`]: the watch-build-notify loop
//! - [`server`] and [`static_files`]: live-reload stream and SPA serving
//! - [`runner`]: keeping a bundled script running under node

pub mod builder;
pub mod control;
pub mod index;
pub mod runner;
pub mod server;
pub mod static_files;
pub mod watcher;

pub use builder::{BuildOutput, Bundler, CommandBundler, Mode};
pub use control::{DevLoop, Pipeline, ReloadPipeline};
pub use index::{IndexRenderer, RenderOutput};
pub use runner::NodePipeline;
pub use server::DevState;
pub use watcher::{next_batch, FileChange, FileWatcher};
