//! CLI argument parsing module for gofer

use crate::config::DEFAULT_MANIFEST_PATH;
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Keep container image and GitHub release dependency versions up to date
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gofer",
    version,
    about = "A CLI utility to help you keep your project's ever-changing dependency versions up to date"
)]
pub struct CliArgs {
    /// Config file containing the list of dependencies
    #[arg(short = 'f', long = "config", global = true, default_value = DEFAULT_MANIFEST_PATH)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - no progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize an empty config file
    Init,

    /// Add a dependency to the config file
    Add(AddArgs),

    /// List the dependencies from the config file
    List(ListArgs),

    /// Fetch the latest versions of all dependencies in the config file
    Dig(DigArgs),

    /// List every available version of one source
    Versions(VersionsArgs),

    /// Reconcile the config file with the document store and report changes
    Sync(SyncArgs),
}

/// Arguments of `add`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Image reference, GitHub repository URL or "manual"
    pub name: String,

    /// Version currently in use
    pub version: String,

    /// A regex to match versions, leave blank to match any version
    #[arg(long, default_value = "")]
    pub mask: String,

    /// Source type, leave empty to autodetect ("github"|"docker"|"manual")
    #[arg(long = "type")]
    pub kind: Option<String>,
}

/// Arguments of `list`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,

    /// Only list the dependencies that have outdated versions
    #[arg(long)]
    pub outdated: bool,

    /// Source type(s), leave empty to select all ("github"|"docker"|"manual")
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<String>,
}

/// Arguments of `dig`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DigArgs {
    /// Output format to print to stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,

    /// Don't overwrite the config file, just print to stdout
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments of `versions`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct VersionsArgs {
    /// Image reference or GitHub repository URL
    pub name: String,

    /// Source type, leave empty to autodetect ("github"|"docker"|"manual")
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// A regex to match versions, leave blank to match any version
    #[arg(long, default_value = "")]
    pub mask: String,
}

/// Arguments of `sync`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Document store root directory
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Collection inside the store
    #[arg(long)]
    pub collection: Option<String>,

    /// Document id inside the collection
    #[arg(long)]
    pub doc: Option<String>,
}
