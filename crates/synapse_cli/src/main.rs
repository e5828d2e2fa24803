//! `synapse` command-line entry point.
//!
//! # Responsibility
//! - Parse global options and subcommands, then delegate to `synapse_core`.
//! - Keep stdout for command output; logs go to stderr or the log directory.
//!
//! # Invariants
//! - Configuration is validated and logging started before any vault access.
//! - `check` exits with status 1 when the vault has failures.

use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use synapse_core::config::{LOG_DIR_ENV, LOG_LEVEL_ENV, WORKDIR_ENV};
use synapse_core::service::network_service;
use synapse_core::{init_logging, NodeKind, SynapseConfig};

type CliResult = Result<ExitCode, Box<dyn Error>>;

/// Synapse - maintain a linked markdown note vault.
#[derive(Parser)]
#[command(name = "synapse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Vault root directory.
    #[arg(long, global = true, env = WORKDIR_ENV, default_value = ".")]
    workdir: PathBuf,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, global = true, env = LOG_LEVEL_ENV, default_value = "warn")]
    log_level: String,

    /// Absolute directory for rotating log files (default: stderr).
    #[arg(long, global = true, env = LOG_DIR_ENV)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Validate the vault and print every failure.
    Check {
        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add missing back-links between notes.
    FixBidirectionalLinks,

    /// Rename a vault file, rewriting links to it.
    Rename {
        /// Current path of the file.
        src: PathBuf,
        /// New path of the file.
        dst: PathBuf,
    },

    /// Re-key an entry, rewriting links to it.
    Rekey {
        /// Current key.
        old: String,
        /// New key.
        new: String,
    },

    /// Link one note to another entry.
    Link {
        /// Key of the note that receives the link.
        from: String,
        /// Key of the link target.
        to: String,
    },

    /// Show one entry with its links and predecessors.
    Show {
        /// Key to resolve.
        key: String,
    },

    /// List vault keys.
    List {
        /// Only list entries of this kind.
        #[arg(long, value_parser = parse_kind)]
        kind: Option<NodeKind>,
    },

    /// Print every topic-to-topic link.
    TopicEdges,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match SynapseConfig::new(&cli.workdir)
        .with_log_level(cli.log_level.as_str())
        .with_log_dir(cli.log_dir.clone())
        .validate()
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.log) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        synapse_core::core_version()
    );

    match run_command(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &SynapseConfig) -> CliResult {
    let root = config.workdir.as_path();

    match command {
        Commands::Check { json } => cmd_check(config, json),
        Commands::FixBidirectionalLinks => {
            let added = network_service::fix_bidirectional_links(root)?;
            println!("Added {added} back-link(s).");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Rename { src, dst } => {
            let src_key = network_service::key_for_path(root, &src)?;
            let dst_key = network_service::key_for_path(root, &dst)?;
            let node = network_service::rekey(root, src_key.as_str(), dst_key.as_str())?;
            println!("{src_key} -> {}", node.key());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Rekey { old, new } => {
            let node = network_service::rekey(root, &old, &new)?;
            println!("{old} -> {}", node.key());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Link { from, to } => {
            network_service::add_link(root, &from, &to)?;
            println!("{from} -> {to}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { key } => cmd_show(root, &key),
        Commands::List { kind } => cmd_list(config, kind),
        Commands::TopicEdges => {
            for (from, to) in config.network().topic_edges()? {
                println!("{from} -> {to}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_check(config: &SynapseConfig, json: bool) -> CliResult {
    let report = network_service::check_report(&config.workdir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for failure in &report.failures {
            println!("{failure}");
        }
    }

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn cmd_show(root: &std::path::Path, key: &str) -> CliResult {
    let node = network_service::lookup(root, key)?;

    println!("key:  {}", node.key());
    println!("kind: {}", node.kind());
    println!("path: {}", node.path().display());

    if let Some(note) = node.as_note() {
        println!("links:");
        for link in note.links()? {
            println!("  {link}");
        }
    }
    println!("predecessors:");
    for predecessor in node.predecessors()? {
        println!("  {predecessor}");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_list(config: &SynapseConfig, kind: Option<NodeKind>) -> CliResult {
    let network = config.network();
    let keys = match kind {
        Some(kind) => network.keys_of_kind(kind)?,
        None => network.iterate()?,
    };
    for key in keys {
        println!("{key}");
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_kind(value: &str) -> Result<NodeKind, String> {
    NodeKind::parse(value).ok_or_else(|| {
        let known: Vec<&str> = NodeKind::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("unknown kind `{value}`; expected one of {}", known.join(", "))
    })
}
