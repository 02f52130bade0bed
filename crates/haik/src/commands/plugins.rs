//! `haik plugins` command implementation.

use std::path::PathBuf;

use clap::Args;
use haik_config::Config;

use super::build_engine;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the plugins command.
#[derive(Args)]
pub(crate) struct PluginsArgs {
    /// Path to configuration file (default: auto-discover haik.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PluginsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let plugins = build_engine(&config).all_plugins();

        if plugins.is_empty() {
            output.note("No plugins available");
            return Ok(());
        }

        let mut listing = plugins.join("\n");
        listing.push('\n');
        output.document(&listing)?;
        Ok(())
    }
}
