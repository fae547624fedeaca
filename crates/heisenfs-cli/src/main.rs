//! heisenfs trace replay binary.
//!
//! Usage:
//!   # Replay a trace file
//!   cargo run -p heisenfs-cli -- replay path/to/session.trace
//!
//!   # Run a canned shell-command trace
//!   cargo run -p heisenfs-cli -- scenario cat
//!
//!   # Show the documented transitions
//!   cargo run -p heisenfs-cli -- edges
//!
//! Anomalous observations are logged at WARN; `RUST_LOG=debug` shows every
//! transition.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use heisenfs_cli::{Reply, Scenario, Step, parse_trace, replay};
use heisenfs_kernel::fs::observe::EDGES;
use heisenfs_kernel::{FilesystemEngine, FileSnapshot, FsConfig, ProcessIdentity};

/// Replay filesystem callback traces against an in-memory heisenfs.
#[derive(Parser, Debug)]
#[command(name = "heisenfs", version)]
#[command(about = "Replay filesystem callback traces against an in-memory heisenfs")]
struct Args {
    /// TOML file with engine limits
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the maximum number of files
    #[arg(long, global = true)]
    max_files: Option<usize>,

    /// Override the per-file capacity in bytes
    #[arg(long, global = true)]
    max_file_size: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a trace file
    Replay {
        /// Trace file, one request per line
        file: PathBuf,
    },
    /// Run a built-in shell command trace
    Scenario {
        #[arg(value_enum)]
        name: Scenario,
    },
    /// Print the documented observation transitions
    Edges,
}

#[derive(serde::Serialize)]
struct Report<'a> {
    steps: &'a [Step],
    files: &'a [FileSnapshot],
    anomalies: u64,
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => FsConfig::load(path)?,
        None => FsConfig::default(),
    };
    if let Some(n) = args.max_files {
        config = config.with_max_files(n);
    }
    if let Some(n) = args.max_file_size {
        config = config.with_max_file_size(n);
    }
    config.validate()?;

    let text = match &args.command {
        Command::Edges => {
            print_edges(args.json)?;
            return Ok(());
        }
        Command::Replay { file } => std::fs::read_to_string(file)
            .with_context(|| format!("failed to read trace {}", file.display()))?,
        Command::Scenario { name } => name.trace().to_string(),
    };

    let requests = parse_trace(&text)?;
    let fs = FilesystemEngine::new(config, Arc::new(ProcessIdentity));
    let steps = replay(&fs, &requests);
    let files = fs.snapshots();
    let report = Report {
        steps: &steps,
        files: &files,
        anomalies: fs.anomaly_count(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_edges(json: bool) -> Result<()> {
    if json {
        let edges: Vec<_> = EDGES
            .iter()
            .map(|e| serde_json::json!({ "from": e.from, "op": e.op, "to": e.to }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&edges)?);
        return Ok(());
    }
    for e in EDGES {
        println!("{:<13} --{:<9}--> {}", e.from, e.op, e.to);
    }
    Ok(())
}

fn print_report(report: &Report<'_>) {
    for step in report.steps {
        let outcome = match (&step.reply, &step.error) {
            (_, Some(err)) => format!("error: {err}"),
            (Some(reply), None) => summarize(reply),
            (None, None) => String::new(),
        };
        println!("{:>4}  {:<32} {}", step.line, step.request, outcome);
    }
    println!();
    for file in report.files {
        println!(
            "{:<36} {:<13} size={:<4} anomalies={}",
            file.name, file.state, file.attr.size, file.anomalies
        );
    }
    println!("total anomalies: {}", report.anomalies);
}

fn summarize(reply: &Reply) -> String {
    match reply {
        Reply::Created { id } => format!("ok id={}", id.short()),
        Reply::Attr { attr } => format!(
            "ok mode={:o} uid={} gid={} size={}",
            attr.mode, attr.uid, attr.gid, attr.size
        ),
        Reply::Names { names } => format!("ok [{}]", names.join(", ")),
        Reply::Entries { entries } => {
            let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
            format!("ok [{}]", names.join(", "))
        }
        Reply::Data { len, text } => format!("ok {len} bytes {text:?}"),
        Reply::Written { count } => format!("ok wrote {count}"),
        Reply::Done => "ok".to_string(),
    }
}
