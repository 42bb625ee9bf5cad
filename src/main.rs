use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zet::{
    Config, GitOperation, NoteId, NoteTarget, SyncOutcome, SystemRunner, TitleEntry, ZetError,
    ZetService, doctor, render,
};

/// zet - a git-backed zettelkasten in your terminal
#[derive(Parser)]
#[command(name = "zet")]
#[command(about = "Create, find, and sync zettelkasten notes kept in a git repository")]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Create a new zet and open it in the editor
    #[command(visible_alias = "new")]
    Create(CreateCommand),

    /// Print the id of the most recently modified zet
    Last,

    /// Open an existing zet in the editor
    Edit {
        #[command(subcommand)]
        target: EditTarget,
    },

    /// List zets whose title contains the query
    Find(QueryCommand),

    /// List zets tagged with #QUERY
    Tags(QueryCommand),

    /// Print a zet, or list every zet
    View {
        #[command(subcommand)]
        target: ViewTarget,
    },

    /// Run a git operation in the zet repository
    Git {
        #[arg(value_enum, value_name = "OPERATION")]
        operation: GitOperation,
    },

    /// Report the zet configuration
    Check,
}

/// Create a new zet
#[derive(Args)]
struct CreateCommand {
    /// Title written as the first heading of the zet
    #[arg(value_name = "TITLE")]
    title: String,
}

/// Search by title or tag
#[derive(Args)]
struct QueryCommand {
    #[arg(value_name = "QUERY")]
    query: String,

    /// Print matches as JSON
    #[arg(long)]
    json: bool,
}

/// Which zet to edit
#[derive(Subcommand)]
enum EditTarget {
    /// The most recently modified zet
    Last,
    /// The zet with the given id
    Id {
        #[arg(value_name = "ID")]
        id: NoteId,
    },
    /// Pick from zets whose title contains the query
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },
}

#[derive(Args)]
struct ViewOptions {
    /// Print the markdown source instead of rendering it
    #[arg(long)]
    raw: bool,
}

/// Which zet to view
#[derive(Subcommand)]
enum ViewTarget {
    /// List every zet
    All {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// The most recently modified zet
    Last(ViewOptions),
    /// The zet with the given id
    Id {
        #[arg(value_name = "ID")]
        id: NoteId,
        #[command(flatten)]
        options: ViewOptions,
    },
    /// Pick from zets whose title contains the query
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
        #[command(flatten)]
        options: ViewOptions,
    },
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // bare `zet` shows usage and succeeds
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return;
    };

    if let Err(e) = run(command, Config::from_env()) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,zet=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// Maps an error to the process exit code.
///
/// 1 for mistakes the user can fix by changing the invocation, 2 otherwise.
fn exit_code(error: &anyhow::Error) -> i32 {
    let user_error = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<ZetError>())
        .any(ZetError::is_user_error);
    if user_error { 1 } else { 2 }
}

fn run(command: Commands, config: Config) -> Result<()> {
    if let Commands::Check = command {
        doctor::run_config_check(&config, &SystemRunner::new());
        return Ok(());
    }

    let service = ZetService::system(config)?;
    match command {
        Commands::Create(cmd) => {
            let outcome = service
                .create(&cmd.title)
                .with_context(|| format!("failed to create zet {:?}", cmd.title))?;
            report_outcome(Some(outcome));
        }
        Commands::Last => println!("{}", service.last()?),
        Commands::Edit { target } => {
            let target = match target {
                EditTarget::Last => NoteTarget::Last,
                EditTarget::Id { id } => NoteTarget::Id(id),
                EditTarget::Search { query } => NoteTarget::Search(query),
            };
            report_outcome(service.edit(&target)?);
        }
        Commands::Find(cmd) => print!("{}", format_entries(&service.find(&cmd.query)?, cmd.json)?),
        Commands::Tags(cmd) => print!("{}", format_entries(&service.tags(&cmd.query)?, cmd.json)?),
        Commands::View { target } => match target {
            ViewTarget::All { json } => print!("{}", format_entries(&service.all()?, json)?),
            ViewTarget::Last(options) => show(&service, &NoteTarget::Last, &options)?,
            ViewTarget::Id { id, options } => show(&service, &NoteTarget::Id(id), &options)?,
            ViewTarget::Search { query, options } => {
                show(&service, &NoteTarget::Search(query), &options)?
            }
        },
        Commands::Git { operation } => service
            .git(operation)
            .with_context(|| format!("git {operation:?} failed"))?,
        Commands::Check => {}
    }
    Ok(())
}

fn report_outcome(outcome: Option<SyncOutcome>) {
    if let Some(outcome) = outcome {
        debug!(?outcome, "sync finished");
    }
}

/// Formats entries one `<id> <title>` per line, or as a JSON array.
fn format_entries(entries: &[TitleEntry], json: bool) -> Result<String> {
    if json {
        let encoded = serde_json::to_string_pretty(entries).map_err(ZetError::from)?;
        return Ok(format!("{encoded}\n"));
    }
    Ok(entries.iter().map(|e| format!("{e}\n")).collect())
}

/// Prints a note, rendered when stdout is a terminal.
fn show(service: &ZetService, target: &NoteTarget, options: &ViewOptions) -> Result<()> {
    let Some(document) = service.view(target)? else {
        return Ok(());
    };
    let styled = !options.raw && io::stdout().is_terminal();
    let mut out = io::stdout().lock();
    if styled {
        render::write_markdown(&mut out, &document)?;
    } else {
        render::write_plain(&mut out, &document)?;
    }
    Ok(())
}
