//! Command-line interface for qarecords.
//!
//! This module provides the CLI structure for the `qarec` binary. Each
//! record subcommand belongs to one of the three views.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::controller::View;
use crate::logging::Verbosity;

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ExportCommand, ImportCommand,
    OutputFormat, SearchCommand, StatusCommand,
};

/// qarec - Keep a personal collection of questions and answers
///
/// Records are stored locally and can be searched, edited, and moved in and
/// out as CSV.
#[derive(Debug, Parser)]
#[command(name = "qarec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enter a new record
    Add(AddCommand),

    /// Change the question or answer of a record
    Edit(EditCommand),

    /// Delete a record
    Delete(DeleteCommand),

    /// Merge records from a CSV file
    Import(ImportCommand),

    /// Search records by question
    Search(SearchCommand),

    /// Export all records as CSV
    Export(ExportCommand),

    /// Show where records are stored and how many there are
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// The view a command works in, if it touches records.
    #[must_use]
    pub fn view(&self) -> Option<View> {
        match self {
            Self::Add(_) => Some(View::Enter),
            Self::Edit(_) | Self::Delete(_) | Self::Import(_) => Some(View::Edit),
            Self::Search(_) | Self::Export(_) => Some(View::Retrieve),
            Self::Status(_) | Self::Config(_) => None,
        }
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                2 => Verbosity::Debug,
                _ => Verbosity::Trace,
            }
        }
    }
}
