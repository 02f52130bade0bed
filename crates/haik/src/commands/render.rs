//! `haik render` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use haik_config::{CliSettings, Config};

use super::build_engine;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover haik.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render soft line breaks as <br> (overrides config).
    #[arg(long)]
    hard_wrap: bool,

    /// Maximum plugin nesting depth (overrides config).
    #[arg(long, env = "HAIK_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Disable a plugin; may be repeated.
    #[arg(long = "disable", value_name = "PLUGIN")]
    disabled: Vec<String>,

    /// Fail when rendering produced warnings.
    #[arg(long)]
    strict: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            hard_wrap: self.hard_wrap.then_some(true),
            max_depth: self.max_depth,
            disabled_plugins: self.disabled.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let source = read_source(self.input.as_deref(), std::io::stdin())?;
        let engine = build_engine(&config);
        let result = engine.render(&source);

        output.warnings(&result.warnings);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &result.html)?;
                output.success(&format!("Rendered to {}", path.display()));
            }
            None => output.document(&result.html)?,
        }

        if self.strict && !result.warnings.is_empty() {
            return Err(CliError::Warnings(result.warnings.len()));
        }
        Ok(())
    }
}

/// Read markdown from `input`, or from `stdin` when no file is given.
fn read_source(input: Option<&Path>, mut stdin: impl Read) -> Result<String, CliError> {
    match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut source = String::new();
            stdin.read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn args(dir: &TempDir, input: &str) -> RenderArgs {
        let config = dir.path().join("haik.toml");
        std::fs::write(&config, "").unwrap();
        RenderArgs {
            input: Some(dir.path().join(input)),
            output: Some(dir.path().join("out.html")),
            config: Some(config),
            hard_wrap: false,
            max_depth: None,
            disabled: Vec::new(),
            strict: false,
            verbose: false,
        }
    }

    #[test]
    fn test_renders_file_to_output_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("page.md"), "# Title\n\n/(icon star)\n").unwrap();

        args(&dir, "page.md").execute().unwrap();

        let html = std::fs::read_to_string(dir.path().join("out.html")).unwrap();
        assert_eq!(
            html,
            "<h1>Title</h1>\n<p><i class=\"haik-plugin-icon glyphicon glyphicon-star\"></i></p>\n"
        );
    }

    #[test]
    fn test_disabled_plugin_stays_literal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("page.md"), "/(icon star)").unwrap();
        let mut args = args(&dir, "page.md");
        args.disabled = vec!["icon".to_owned()];

        args.execute().unwrap();

        let html = std::fs::read_to_string(dir.path().join("out.html")).unwrap();
        assert_eq!(html, "<p>/(icon star)</p>\n");
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("page.md"), ":::cols 8, 8\na\n====\nb\n:::\n").unwrap();
        let mut args = args(&dir, "page.md");
        args.strict = true;

        let err = args.execute().unwrap_err();

        assert!(matches!(err, CliError::Warnings(1)), "{err}");
        assert!(dir.path().join("out.html").exists());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();

        let err = args(&dir, "missing.md").execute().unwrap_err();

        assert!(matches!(err, CliError::Read { .. }), "{err}");
    }

    #[test]
    fn test_read_source_from_stdin() {
        let source = read_source(None, "/(icon star)".as_bytes()).unwrap();
        assert_eq!(source, "/(icon star)");
    }
}
