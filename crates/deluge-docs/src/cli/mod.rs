//! Command-line interface for deluge-docs.
//!
//! This module provides the CLI structure for the `dlgdoc` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CheckCommand, ConfigCommand, ControlsCommand, KeyCommand, KeyFormat, RenderCommand,
    ScreenCommand,
};

/// dlgdoc - Render Deluge documentation directives
///
/// Replaces `:key[...]` button combos and `:screen[...]` OLED mockups in
/// markdown with HTML.
#[derive(Debug, Parser)]
#[command(name = "dlgdoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace directives in a markdown file
    Render(RenderCommand),

    /// Check that every directive in the given files renders
    Check(CheckCommand),

    /// Render a single shortcut
    Key(KeyCommand),

    /// Rasterize a single OLED screen
    Screen(ScreenCommand),

    /// List the controls shortcuts may name
    Controls(ControlsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// The configuration file selected by `--config`, or the default path.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::Config::default_config_path)
    }

    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
