//! PCTX CLI - Command-line interface for project context management.

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use pctx_core::PctxError;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "pctx")]
#[command(about = "Manage AI project context, sessions and archives", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root holding PROJECT_CONTEXT.json
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the context document if absent
    Init,
    /// Print the context document
    Status,
    /// Record a work session
    Session {
        /// Domain the session worked on
        #[arg(long)]
        domain: Option<String>,
        /// Deliverables created
        #[arg(long, num_args = 1..)]
        deliverables: Vec<String>,
        /// Tokens consumed
        #[arg(long, default_value = "0")]
        tokens_in: u64,
        /// Tokens generated
        #[arg(long, default_value = "0")]
        tokens_out: u64,
        /// AI model used (defaults to session.default_model)
        #[arg(long)]
        model: Option<String>,
    },
    /// Update a domain and make it the active one
    Domain {
        /// Domain name
        #[arg(long)]
        domain: Option<String>,
        /// Files created (replaces files_created)
        #[arg(long, num_args = 1..)]
        deliverables: Vec<String>,
        /// Decisions made (replaces decisions_made)
        #[arg(long, num_args = 1..)]
        decisions: Vec<String>,
        /// Critical facts (replaces critical_facts)
        #[arg(long, num_args = 1..)]
        facts: Vec<String>,
        /// Constraints (replaces constraints)
        #[arg(long, num_args = 1..)]
        constraints: Vec<String>,
        /// Domain status (e.g. active, inactive)
        #[arg(long)]
        status: Option<String>,
        /// Domain priority
        #[arg(long)]
        priority: Option<i64>,
    },
    /// Archive a domain, or list archived entries
    Archive {
        /// Domain name
        #[arg(long)]
        domain: Option<String>,
        /// List the archive index instead
        #[arg(long, conflicts_with = "domain")]
        list: bool,
    },
    /// Archive inactive domains to shrink the context
    Compress {
        /// Archive every domain except the active one
        #[arg(long)]
        aggressive: bool,
    },
    /// Archive the whole context and start from a fresh skeleton
    Reset {
        /// Do not carry the active domain over
        #[arg(long)]
        discard_active: bool,
    },
    /// Write AI_HANDOFF.md
    Handoff {
        /// Next task description
        #[arg(long)]
        next_task: Option<String>,
        /// Recent decisions
        #[arg(long, num_args = 1..)]
        decisions: Vec<String>,
        /// Active files
        #[arg(long, num_args = 1..)]
        files: Vec<String>,
    },
    /// Show project statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", style("error:").red().bold(), err);
            if let Some(hint) = err
                .downcast_ref::<PctxError>()
                .and_then(PctxError::recovery_suggestion)
            {
                eprintln!("  {} {}", style("hint:").cyan(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = cli.root.as_path();
    tracing::debug!(root = %root.display(), "using project root");

    match cli.command {
        Commands::Init => commands::init::run(root),
        Commands::Status => commands::status::run(root),
        Commands::Session {
            domain,
            deliverables,
            tokens_in,
            tokens_out,
            model,
        } => commands::session::run(
            root,
            domain.as_deref(),
            deliverables,
            tokens_in,
            tokens_out,
            model.as_deref(),
        ),
        Commands::Domain {
            domain,
            deliverables,
            decisions,
            facts,
            constraints,
            status,
            priority,
        } => commands::domain::run(
            root,
            domain.as_deref(),
            commands::domain::DomainArgs {
                files_created: deliverables,
                decisions_made: decisions,
                critical_facts: facts,
                constraints,
                status,
                priority,
            },
        ),
        Commands::Archive { domain, list } => {
            if list {
                commands::archive::list(root)
            } else {
                commands::archive::run(root, domain.as_deref())
            }
        }
        Commands::Compress { aggressive } => commands::compress::run(root, aggressive),
        Commands::Reset { discard_active } => commands::reset::run(root, !discard_active),
        Commands::Handoff {
            next_task,
            decisions,
            files,
        } => commands::handoff::run(root, next_task.as_deref(), &decisions, &files),
        Commands::Stats { json } => commands::stats::run(root, json),
    }
}
