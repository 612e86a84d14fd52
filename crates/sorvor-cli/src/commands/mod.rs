//! Command implementations.
//!
//! - [`dev`] - Development server with live reload, or run mode for scripts
//! - [`build`] - One-off production build
//!
//! Each command provides an `execute` function taking its parsed arguments.

pub mod build;
pub mod dev;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
