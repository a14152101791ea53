//! CLI layer: argument parsing, command dispatch, and subcommand implementations.

pub mod args;
mod info;

pub use args::*;

use std::fs;
use std::path::Path;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use beannav::{
    facts, save_snapshot, BeanError, BeanInjectionPoint, BeanWorkspace, InjectionSiteKind,
    InjectionStatus, Navigation, SourceLocation,
};

pub(crate) const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATETIME"), ")");

// ─── CLI ─────────────────────────────────────────────────────────────

/// Static dependency-injection resolution: which bean gets injected where
#[derive(Parser, Debug)]
#[command(name = "beannav", version = VERSION, about, after_help = "\
Run 'beannav <COMMAND> --help' for detailed options and examples.\n\
Common options: -f <DIR> (facts directory), --snapshot <FILE>, --log-level <LEVEL>")]
pub(crate) struct Cli {
    /// Log level for stderr output (error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, global = true, default_value = "warn",
          value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Emit log records as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Ingest a facts directory and save the bean snapshot read by `info`.
    /// Other commands always rebuild from the facts directory.
    Index(IndexArgs),

    /// Resolve a synthetic injection point and print the outcome as JSON
    Resolve(ResolveArgs),

    /// Classify every injection point as resolved, ambiguous or unresolved
    Check(CheckArgs),

    /// List known interfaces with their implementing beans
    Interfaces(InterfacesArgs),

    /// Show snapshot info
    Info(InfoArgs),
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let result = match cli.command {
        Commands::Index(args) => cmd_index(args),
        Commands::Resolve(args) => cmd_resolve(args),
        Commands::Check(args) => cmd_check(args).map(|clean| {
            if !clean {
                std::process::exit(1);
            }
        }),
        Commands::Interfaces(args) => cmd_interfaces(args),
        Commands::Info(args) => info::cmd_info(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Build a workspace from every facts batch under the source directory.
pub(crate) fn load_workspace(source: &SourceArgs) -> Result<BeanWorkspace, BeanError> {
    let start = Instant::now();
    let batches = facts::load_dir(Path::new(&source.facts))?;
    let files = batches.len();
    let mut ws = BeanWorkspace::new();
    ws.ingest_all(batches);
    info!(
        dir = %source.facts,
        files,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Workspace ready"
    );
    Ok(ws)
}

/// Synthetic injection point for `resolve`.
pub(crate) fn point_from_args(args: &ResolveArgs) -> Result<BeanInjectionPoint, BeanError> {
    if args.ty.trim().is_empty() {
        return Err(BeanError::InvalidArgs("--type must name a type".to_string()));
    }
    let mut point = BeanInjectionPoint::new(&args.ty, SourceLocation::new("<cli>", 0, 0), InjectionSiteKind::Field);
    point.qualifier_hint = args.qualifier.clone();
    point.explicit_bean_name = args.name.clone();
    Ok(point)
}

// ─── Commands ───────────────────────────────────────────────────────

fn cmd_index(args: IndexArgs) -> Result<(), BeanError> {
    let ws = load_workspace(&args.source)?;
    let path = args.source.snapshot_path();
    save_snapshot(&ws.snapshot(), &path)?;
    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    let stats = ws.stats();
    eprintln!(
        "Snapshot saved to {} ({} beans, {} injection points, {:.1} KB)",
        path.display(),
        stats.beans.beans,
        stats.beans.injection_points,
        size as f64 / 1024.0
    );
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> Result<(), BeanError> {
    let point = point_from_args(&args)?;
    let ws = load_workspace(&args.source)?;
    let nav = ws.navigate(&point);
    println!("{}", serde_json::to_string_pretty(&nav)?);

    let targets = nav.targets();
    match &nav {
        Navigation::Interface { interface, result } => {
            eprintln!("{} -> {} ({} bean(s)) via interface {}", args.ty, result.kind(), targets.len(), interface)
        }
        Navigation::Concrete { candidates } => {
            eprintln!("{} -> {} candidate(s) by type", args.ty, candidates.len())
        }
    }
    Ok(())
}

/// Returns false when `--strict` is set and any point is not resolved.
fn cmd_check(args: CheckArgs) -> Result<bool, BeanError> {
    let ws = load_workspace(&args.source)?;
    let diagnostics = ws.diagnose();

    if args.json {
        let shown: Vec<_> = diagnostics
            .iter()
            .filter(|d| args.all || d.status != InjectionStatus::Resolved)
            .collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        for diag in &diagnostics {
            if !args.all && diag.status == InjectionStatus::Resolved {
                continue;
            }
            let hint = diag
                .point
                .qualifier_hint
                .as_deref()
                .or(diag.point.explicit_bean_name.as_deref())
                .map(|h| format!(" @{}", h))
                .unwrap_or_default();
            println!(
                "{}: {} {}{} [{}]",
                diag.point.location,
                diag.status,
                diag.point.requested_type,
                hint,
                diag.beans.join(", ")
            );
        }
    }

    let ambiguous = diagnostics.iter().filter(|d| d.status == InjectionStatus::Ambiguous).count();
    let unresolved = diagnostics.iter().filter(|d| d.status == InjectionStatus::Unresolved).count();
    eprintln!(
        "{} injection points: {} resolved, {} ambiguous, {} unresolved",
        diagnostics.len(),
        diagnostics.len() - ambiguous - unresolved,
        ambiguous,
        unresolved
    );

    let problems = ws.validate();
    if !problems.is_empty() {
        eprintln!("Interface registry inconsistencies: {}", problems.len());
    }

    Ok(!args.strict || ambiguous + unresolved == 0)
}

fn cmd_interfaces(args: InterfacesArgs) -> Result<(), BeanError> {
    let ws = load_workspace(&args.source)?;
    let filter = args.filter.as_deref().map(str::to_lowercase);

    let mut shown = 0usize;
    for fqn in ws.interfaces().known_interfaces() {
        if let Some(f) = &filter {
            if !fqn.to_lowercase().contains(f.as_str()) {
                continue;
            }
        }
        shown += 1;
        let marker = match ws.interfaces().get_interface(fqn) {
            Some(def) if def.is_abstract_class => " (abstract class)".to_string(),
            Some(def) => format!(" ({})", def.location),
            None => " (no definition)".to_string(),
        };
        println!("{}{}", fqn, marker);
        for bean in ws.implementations(fqn) {
            let primary = if bean.is_primary { " [primary]" } else { "" };
            println!("  {} : {}{}", bean.name, bean.ty, primary);
        }
    }
    eprintln!("{} interface(s)", shown);
    Ok(())
}
