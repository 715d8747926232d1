use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notejar::config::ConfigError;
use notejar::logging::{Verbosity, init_logging};
use notejar::{Config, Database, Note, NoteId, NoteService, StoreError, web};

/// notejar - jot notes into a JSON file
#[derive(Parser)]
#[command(name = "notejar")]
#[command(about = "A minimal note-taking tool backed by a JSON file")]
#[command(version)]
struct Cli {
    /// Path to the notes file (overrides NOTEJAR_DB)
    #[arg(long, global = true, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Create a new note
    New(NewCommand),
    /// Get all notes
    All,
    /// Get notes whose content matches a filter
    Find(FindCommand),
    /// Remove a note by id
    Remove(RemoveCommand),
    /// Launch a website to see notes
    Web(WebCommand),
    /// Remove all notes
    Clean,
}

/// Create a new note
#[derive(Parser)]
struct NewCommand {
    /// The content of the note you want to create
    #[arg(value_name = "NOTE")]
    note: String,

    /// Comma-separated tags to add to the note
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

/// Find notes by content
#[derive(Parser)]
struct FindCommand {
    /// Case-insensitive search term applied to note content
    #[arg(value_name = "FILTER")]
    filter: String,
}

/// Remove a note
#[derive(Parser)]
struct RemoveCommand {
    /// The id of the note you want to remove
    #[arg(value_name = "ID")]
    id: NoteId,
}

/// Serve notes as HTML
#[derive(Parser)]
struct WebCommand {
    /// Port to bind on (defaults to NOTEJAR_PORT or 5000)
    #[arg(value_name = "PORT")]
    port: Option<u16>,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Err(e) = run(cli) {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are a missing or unparsable notes file and bad configuration
/// values. Anything else, such as a failed write, is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_document_error)
            || cause.is::<ConfigError>()
    })
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open notes file: {}",
            config.database_path.display()
        )
    })?;
    let service = NoteService::new(db);

    let mut stdout = io::stdout();

    match cli.command {
        Commands::New(cmd) => {
            execute_new(&service, &cmd.note, cmd.tags.as_deref(), &mut stdout.lock())
        }
        Commands::All => execute_all(&service, &mut stdout.lock()),
        Commands::Find(cmd) => execute_find(&service, &cmd.filter, &mut stdout.lock()),
        Commands::Remove(cmd) => execute_remove(&service, cmd.id, &mut stdout.lock()),
        // The server runs until killed, so it writes through the unlocked handle.
        Commands::Web(cmd) => {
            let port = web_port(cmd.port, &config);
            execute_web(&service, &config, port, &mut stdout)
        }
        Commands::Clean => execute_clean(&service, &mut stdout.lock()),
    }
}

/// Picks the port for `notejar web`: the positional argument, then the
/// configured port (`NOTEJAR_PORT`, default 5000).
fn web_port(arg: Option<u16>, config: &Config) -> u16 {
    arg.unwrap_or(config.port)
}

fn execute_new(
    service: &NoteService,
    content: &str,
    tags: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let note = service
        .create_note(content, parse_tags(tags))
        .context("Failed to create note")?;

    writeln!(out, "Note added! (id: {})", note.id())?;
    write_note(out, &note)?;
    Ok(())
}

fn execute_all(service: &NoteService, out: &mut impl Write) -> Result<()> {
    let notes = service.list_notes().context("Failed to read notes")?;
    write_notes(out, &notes)?;
    Ok(())
}

fn execute_find(service: &NoteService, filter: &str, out: &mut impl Write) -> Result<()> {
    let notes = service.find_notes(filter).context("Failed to search notes")?;
    write_notes(out, &notes)?;
    Ok(())
}

fn execute_remove(service: &NoteService, id: NoteId, out: &mut impl Write) -> Result<()> {
    match service.remove_note(id).context("Failed to remove note")? {
        Some(id) => writeln!(out, "Note removed: {id}")?,
        None => writeln!(out, "Note not found")?,
    }
    Ok(())
}

fn execute_clean(service: &NoteService, out: &mut impl Write) -> Result<()> {
    service
        .remove_all_notes()
        .context("Failed to remove notes")?;
    writeln!(out, "All notes removed")?;
    Ok(())
}

/// Serves a snapshot of the current notes until the process is stopped.
fn execute_web(
    service: &NoteService,
    config: &Config,
    port: u16,
    out: &mut impl Write,
) -> Result<()> {
    let notes = service.list_notes().context("Failed to read notes")?;
    let app = web::router(notes, config.template_path.clone());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind((config.host.as_str(), port))
            .await
            .with_context(|| format!("Failed to bind {}:{port}", config.host))?;
        let addr = listener.local_addr()?;
        writeln!(out, "Server is listening on http://{addr}")?;
        out.flush()?;

        web::serve(listener, app).await.context("Server failed")
    })
}

/// Splits the `--tags` value on commas.
///
/// Tags are kept verbatim, including surrounding whitespace and empty
/// entries. A missing or empty value means no tags.
fn parse_tags(input: Option<&str>) -> Vec<String> {
    match input {
        Some(tags) if !tags.is_empty() => tags.split(',').map(String::from).collect(),
        _ => Vec::new(),
    }
}

fn write_notes(out: &mut impl Write, notes: &[Note]) -> io::Result<()> {
    for note in notes {
        write_note(out, note)?;
    }
    Ok(())
}

fn write_note(out: &mut impl Write, note: &Note) -> io::Result<()> {
    writeln!(out, "id: {}", note.id())?;
    writeln!(out, "tags: {}", note.tags().join(", "))?;
    writeln!(out, "note: {}", note.content())?;
    writeln!(out)
}
