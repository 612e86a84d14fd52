//! Shared helpers for command implementations.

use crate::error::{BuildError, Result};
use crate::ui;
use std::path::{Path, PathBuf};

/// Create the output directory if needed.
pub fn ensure_output_dir(out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir).map_err(|e| {
        BuildError::WriteFailed {
            path: out_dir.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Print every diagnostic.
pub fn report_diagnostics(diagnostics: &[String]) {
    for diagnostic in diagnostics {
        ui::diagnostic(diagnostic);
    }
}

/// Display names and sizes of output files, relative to `cwd` when possible.
pub fn output_sizes(files: &[PathBuf], cwd: &Path) -> Vec<(String, u64)> {
    files
        .iter()
        .map(|file| {
            let name = file.strip_prefix(cwd).unwrap_or(file).display().to_string();
            let size = std::fs::metadata(file).map(|meta| meta.len()).unwrap_or(0);
            (name, size)
        })
        .collect()
}
