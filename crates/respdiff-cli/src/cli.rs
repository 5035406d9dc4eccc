use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "respdiff",
    version,
    about = "Compare a candidate API response against a reference response"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare one reference/candidate pair
    Compare {
        reference: PathBuf,
        candidate: PathBuf,
        #[arg(long, help = "Endpoint label used in the report")]
        endpoint: Option<String>,
        #[command(flatten)]
        options: CompareArgs,
    },
    /// Compare every <name>.reference.json / <name>.candidate.json pair in a directory
    Batch {
        dir: PathBuf,
        #[arg(long, help = "Only compare pairs whose name contains this text (case-insensitive)")]
        filter: Option<String>,
        #[command(flatten)]
        options: CompareArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CompareArgs {
    #[arg(long = "ignore", value_name = "FIELD", help = "Field name to exclude at any depth (repeatable)")]
    pub ignore: Vec<String>,
    #[arg(long, help = "Compare raw values without normalization")]
    pub no_normalize: bool,
    #[arg(long, value_name = "FILE", help = "YAML comparison config (defaults to $RESPDIFF_CONFIG)")]
    pub config: Option<PathBuf>,
}
