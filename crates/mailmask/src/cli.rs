//! Command-line handling for the mailmask binary.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use mailmask_core::ServerConfig;
use mailmask_page::Page;

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: mailmask [--config <path>] [--scan <file.html>]

Without --scan, runs the MCP server on stdio.

Options:
  --config <path>   YAML configuration file
  --scan <file>     Print the email inputs of an HTML file as JSON and exit
  -h, --help        Print this help";

/// Parsed command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Configuration file
    pub config: Option<PathBuf>,
    /// HTML file to scan instead of serving
    pub scan: Option<PathBuf>,
    /// Print usage and exit
    pub help: bool,
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config requires a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--scan" => {
                    let path = args.next().context("--scan requires a file")?;
                    parsed.scan = Some(PathBuf::from(path));
                }
                "-h" | "--help" => parsed.help = true,
                other => bail!("unknown argument: {other}\n\n{USAGE}"),
            }
        }

        Ok(parsed)
    }

    /// Load the configuration file, or defaults when none was given.
    pub fn load_config(&self) -> anyhow::Result<ServerConfig> {
        match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display())),
            None => Ok(ServerConfig::default()),
        }
    }
}

/// Run the script-load pass over an HTML file and return the report as JSON.
pub fn scan_file(path: &Path, config: &ServerConfig) -> anyhow::Result<String> {
    let (_, report) = Page::open_file(path, config.injection.clone())
        .with_context(|| format!("failed to scan {}", path.display()))?;
    Ok(serde_json::to_string_pretty(&report)?)
}
