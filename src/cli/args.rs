//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Inspect and manipulate workspace item trees (collections and requests)
#[derive(Parser, Debug)]
#[command(name = "nightingale-tree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file (overrides defaults, overridden by NIGHTINGALE_* env vars)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a workspace document as a tree
    Show {
        /// Workspace document (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Hide the children of collapsed items
        #[arg(long)]
        collapsed: bool,
    },

    /// Duplicate an item next to the original and print the resulting document
    Duplicate {
        /// Workspace document (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Slash-separated names from the root, e.g. `Users/Get user`
        path: String,
    },

    /// Print the effective settings
    Config,
}
