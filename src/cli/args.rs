//! CLI argument structs for all subcommands.

use std::path::PathBuf;

use clap::{Args, Parser};

/// Where facts come from and where the snapshot lives. Shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory containing *.facts.json batches
    #[arg(short, long, default_value = ".")]
    pub facts: String,

    /// Snapshot file (default: <local data dir>/beannav/<hash of facts dir>.beans)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl SourceArgs {
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.snapshot {
            Some(path) => path.clone(),
            None => beannav::storage::snapshot_path_for(&self.facts, &beannav::storage::snapshot_dir()),
        }
    }
}

#[derive(Parser, Debug)]
pub struct IndexArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug)]
#[command(after_help = "\
Examples:
  beannav resolve -f target/facts -t PaymentService
  beannav resolve -f target/facts -t com.example.PaymentService -q paypalPaymentService")]
pub struct ResolveArgs {
    /// Requested type, fully qualified or simple
    #[arg(short = 't', long = "type")]
    pub ty: String,

    /// @Qualifier value on the injection point
    #[arg(short, long)]
    pub qualifier: Option<String>,

    /// Explicit bean name (@Resource(name = ...))
    #[arg(short, long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Exit with status 1 when any injection point is ambiguous or unresolved
    #[arg(long)]
    pub strict: bool,

    /// Print diagnostics as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also list injection points that resolve cleanly
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug)]
pub struct InterfacesArgs {
    /// Only interfaces whose FQN contains this substring (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}
