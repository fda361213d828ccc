//! Command-line argument parsing for budgetsim
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::report::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// budgetsim - Simulate how a timeout budget is split across sequential steps
#[derive(Parser, Debug)]
#[command(name = "budgetsim")]
#[command(version)]
#[command(about = "Simulate how a root timeout budget is divided across a sequence of steps", long_about = None)]
pub struct Args {
    /// Scenario file (defaults to ~/.budgetsim/config.toml, then built-in demos)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Report format, overriding the scenario file
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Run only the simulator with this name
    #[arg(long, value_name = "NAME")]
    pub only: Option<String>,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only on stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run every configured simulator (default)
    Run,

    /// Load and validate the scenario without running it
    Validate,

    /// Display the effective configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to execute, `run` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

impl Verbosity {
    /// Default log filter for this verbosity
    pub fn log_level(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}
