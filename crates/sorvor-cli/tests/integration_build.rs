//! Integration tests for the build command.
//!
//! A bundler double writes predictable outputs so the tests exercise config
//! loading, rendering and failure reporting without esbuild installed.

use async_trait::async_trait;
use sorvor_cli::commands::build;
use sorvor_cli::config::{ConfigOverrides, SorvorConfig};
use sorvor_cli::dev::{BuildOutput, Bundler};
use sorvor_cli::error::{BuildError, CliError, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Copies each entry to `<out_dir>/<stem>.js`, or fails with a diagnostic.
struct CopyBundler {
    out_dir: PathBuf,
    fail: bool,
}

#[async_trait]
impl Bundler for CopyBundler {
    async fn build(&self, entry_points: &[PathBuf]) -> Result<BuildOutput> {
        if self.fail {
            return Ok(BuildOutput {
                output_files: vec![],
                diagnostics: vec!["[ERROR] Unexpected end of file (src/app.js:1:5)".to_string()],
                success: false,
            });
        }

        let mut output_files = Vec::new();
        for entry in entry_points {
            let out = self
                .out_dir
                .join(format!("{}.js", entry.file_stem().unwrap().to_string_lossy()));
            fs::copy(entry, &out)?;
            output_files.push(out);
        }
        Ok(BuildOutput {
            output_files,
            diagnostics: vec![],
            success: true,
        })
    }
}

fn html_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("public")).unwrap();
    fs::write(
        root.join("public/index.html"),
        r#"<!doctype html>
<html>
<head><title>{{ pkg.name }}</title></head>
<body>
<script type="module" src="{{ esbuild("app.js") }}"></script>
{{ livereload() }}
</body>
</html>"#,
    )
    .unwrap();
    fs::write(root.join("public/app.js"), "export const answer = 42;").unwrap();
    fs::write(root.join("package.json"), r#"{ "name": "shop", "version": "1.0.0" }"#).unwrap();
    temp
}

fn load(root: &std::path::Path, overrides: ConfigOverrides) -> SorvorConfig {
    let config = SorvorConfig::load(&overrides, Some(root)).unwrap();
    config.validate().unwrap();
    config
}

#[tokio::test]
async fn test_build_html_entry() {
    let temp = html_project();
    let config = load(temp.path(), ConfigOverrides::default());
    let bundler = Arc::new(CopyBundler {
        out_dir: config.out_dir_path(),
        fail: false,
    });

    build::build(&config, bundler).await.unwrap();

    let html = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
    assert!(html.contains("<title>shop</title>"));
    assert!(html.contains(r#"<script type="module" src="/app.js"></script>"#));
    assert!(!html.contains("EventSource"));
    assert_eq!(
        fs::read_to_string(temp.path().join("dist/app.js")).unwrap(),
        "export const answer = 42;"
    );
}

#[tokio::test]
async fn test_build_script_entry() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(temp.path().join("src/server.js"), "console.log('up')").unwrap();

    let config = load(
        temp.path(),
        ConfigOverrides {
            entry: Some(PathBuf::from("src/server.js")),
            out_dir: Some(PathBuf::from("build")),
            ..ConfigOverrides::default()
        },
    );
    let bundler = Arc::new(CopyBundler {
        out_dir: config.out_dir_path(),
        fail: false,
    });

    build::build(&config, bundler).await.unwrap();

    assert!(temp.path().join("build/server.js").is_file());
    assert!(!temp.path().join("build/index.html").exists());
}

#[tokio::test]
async fn test_build_failure_is_error() {
    let temp = html_project();
    let config = load(temp.path(), ConfigOverrides::default());
    let bundler = Arc::new(CopyBundler {
        out_dir: config.out_dir_path(),
        fail: true,
    });

    let err = build::build(&config, bundler).await.unwrap_err();

    match err {
        CliError::Build(BuildError::Failed { entry, errors }) => {
            assert_eq!(entry, "public/index.html");
            assert_eq!(errors, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_build_template_error() {
    let temp = html_project();
    fs::write(temp.path().join("public/index.html"), "{% if %}").unwrap();
    let config = load(temp.path(), ConfigOverrides::default());
    let bundler = Arc::new(CopyBundler {
        out_dir: config.out_dir_path(),
        fail: false,
    });

    let err = build::build(&config, bundler).await.unwrap_err();
    assert!(matches!(err, CliError::Template(_)));
}
