use std::path::PathBuf;

use arbor_engine::DropOperation;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "arbor",
    about = "Arbor: drag-and-drop tree edits and change reconciliation",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a tree with the hierarchical index of every node
    Show(ShowArgs),
    /// Move a node by drag-and-drop and report the changes
    Drop(DropArgs),
    /// Flip the expanded flag of a folder
    Toggle(ToggleArgs),
    /// Show the drag clue for a candidate drop
    Classify(ClassifyArgs),
    /// Compare two tree versions by stable id
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    pub tree: PathBuf,
}

#[derive(Args)]
pub struct DropArgs {
    pub tree: PathBuf,
    /// Index of the dragged node
    pub drag: String,
    /// One of before, after, child
    pub operation: DropOperation,
    /// Index of the destination node
    pub target: String,
    /// Write the new tree here instead of discarding it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ToggleArgs {
    pub tree: PathBuf,
    pub index: String,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ClassifyArgs {
    pub tree: PathBuf,
    pub drag: String,
    pub target: String,
    pub operation: DropOperation,
}

#[derive(Args)]
pub struct DiffArgs {
    pub before: PathBuf,
    pub after: PathBuf,
}
