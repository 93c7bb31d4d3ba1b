use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use specview_types::FieldKind;

#[derive(Parser)]
#[command(
    name = "specview",
    about = "Browse fork-versioned specification artifacts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Fork policy file (TOML)
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
    /// List included forks, oldest first
    Forks(ForksArgs),
    /// Compare variables across forks and datasets
    Vars(VarsArgs),
    /// Show how items changed across forks
    Items(ItemsArgs),
    /// Resolve a deep link such as `#functions/process_slots@ALTAIR`
    Show(ShowArgs),
}

#[derive(Args)]
pub struct ForksArgs {
    pub artifact: PathBuf,
}

/// Filters shared by the listing commands.
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Dataset to show (defaults to the first one)
    #[arg(long)]
    pub dataset: Option<String>,
    /// Case-insensitive search over names and values
    #[arg(short, long)]
    pub search: Option<String>,
    /// Only entries introduced or changed at this fork (repeatable)
    #[arg(long = "fork")]
    pub forks: Vec<String>,
}

#[derive(Args)]
pub struct VarsArgs {
    pub artifact: PathBuf,
    #[arg(long, default_value = "constant_vars")]
    pub field: FieldKind,
    /// Second dataset to compare against
    #[arg(long)]
    pub compare: Option<String>,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args)]
pub struct ItemsArgs {
    pub artifact: PathBuf,
    #[arg(long, default_value = "functions")]
    pub field: FieldKind,
    /// Show a diff between consecutive changes
    #[arg(long)]
    pub diff: bool,
    /// Align diffs with the Myers algorithm instead of by line position
    #[arg(long)]
    pub myers: bool,
    /// Show only the header of this item (repeatable)
    #[arg(long = "collapse")]
    pub collapsed: Vec<String>,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args)]
pub struct ShowArgs {
    pub artifact: PathBuf,
    pub link: String,
    #[arg(long)]
    pub dataset: Option<String>,
    #[arg(long)]
    pub compare: Option<String>,
    #[arg(long)]
    pub myers: bool,
}
