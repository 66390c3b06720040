use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exifcommit::editor::CommandEditor;
use exifcommit::models::ReconciliationOutcome;
use exifcommit::store::ExifToolStore;
use exifcommit::{CommitError, Config, Workflow};

#[derive(Parser)]
#[command(name = "exifcommit")]
#[command(about = "Batch-edit an image metadata field through your text editor")]
#[command(after_help = "Environment:\n  \
    EDITOR            editor used for the draft (default: vim)\n  \
    EXIFCOMMIT_PATH   extra directories to search, in PATH syntax")]
struct Cli {
    /// Match files named *TERM* in each search directory (prompted if omitted)
    term: Option<String>,

    #[arg(hide = true)]
    ignored: Vec<String>,

    /// Metadata field to edit
    #[arg(short, long)]
    field: Option<String>,

    /// Editor command, overrides $EDITOR
    #[arg(short, long)]
    editor: Option<String>,

    /// Do not keep a copy of each original file
    #[arg(long)]
    overwrite_original: bool,

    /// exiftool executable
    #[arg(long)]
    exiftool: Option<String>,
}

/// Logs go to stderr; stdout carries the user-facing lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "exifcommit=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn prompt_term() -> anyhow::Result<String> {
    println!("Search term:");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read search term")?;
    Ok(line.trim().to_string())
}

fn report(outcome: &ReconciliationOutcome) {
    for path in outcome.written() {
        println!("updated {}", path.display());
    }
    for (path, reason) in outcome.skipped() {
        eprintln!("warning: skipped {}: {}", path.display(), reason);
    }
    for (path, reason) in outcome.failed() {
        eprintln!("warning: could not write {}: {}", path.display(), reason);
    }
    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
}

fn run(cli: Cli) -> anyhow::Result<ReconciliationOutcome> {
    if !cli.ignored.is_empty() {
        println!("Notice: Ignoring all but first argument.");
    }
    let term = match cli.term {
        Some(term) => term,
        None => prompt_term()?,
    };

    let mut config = Config::load();
    if let Some(field) = cli.field {
        config.field_name = field;
    }
    if let Some(editor) = cli.editor {
        config.editor_command = editor;
    }
    if let Some(exiftool) = cli.exiftool {
        config.exiftool = exiftool;
    }
    if cli.overwrite_original {
        config.preserve_originals = false;
    }

    let store = ExifToolStore::from_command(&config.exiftool)
        .with_context(|| format!("Invalid exiftool command {:?}", config.exiftool))?;
    let editor = CommandEditor::new(config.editor_command.clone());
    let mut workflow = Workflow::new(config, store, editor);
    Ok(workflow.run(&term)?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(outcome) => {
            report(&outcome);
            if outcome.is_clean() {
                ExitCode::SUCCESS
            } else {
                let failed = outcome.failed().count();
                eprintln!("{} file(s) could not be written", failed);
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            match e.downcast_ref::<CommitError>() {
                Some(err) if err.is_empty_input() => eprintln!("Nothing to do: {}", err),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
