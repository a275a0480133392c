//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};

/// Render command arguments.
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Markdown file to process (`-` for stdin)
    pub input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Markdown files to check
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Key command arguments.
#[derive(Debug, Args)]
pub struct KeyCommand {
    /// The shortcut, e.g. "Shift + Load > Load"
    pub sequence: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    pub format: KeyFormat,
}

/// Screen command arguments.
#[derive(Debug, Args)]
pub struct ScreenCommand {
    /// Base64 gzip payload, or `@FILE` to read it from a file
    pub payload: String,

    /// Alt text for the image tag
    #[arg(long)]
    pub alt: Option<String>,

    /// Scale factor (defaults to the configured scale)
    #[arg(short, long)]
    pub scale: Option<u32>,

    /// Write the PNG here instead of printing an image tag
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Controls command arguments.
#[derive(Debug, Args)]
pub struct ControlsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl ConfigCommand {
    /// The file this command acts on: `validate --file` if given, otherwise
    /// `config_path` (from `--config` or the default location).
    #[must_use]
    pub fn config_file(&self, config_path: &Path) -> PathBuf {
        match self {
            Self::Validate { file: Some(file) } => file.clone(),
            _ => config_path.to_path_buf(),
        }
    }
}

/// Output format for the key command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum KeyFormat {
    /// Inline HTML
    #[default]
    Html,
    /// The text the search indexer sees
    Search,
    /// Parsed chords as JSON
    Json,
}
