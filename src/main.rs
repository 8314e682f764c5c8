use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glossary_tools::sync::{self, ExportConfig, QuizConfig};
use glossary_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::Export(args) => execute_export(args),
        Command::Quiz(args) => execute_quiz(args),
        Command::Add(args) => execute_add(args),
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_export(args: ExportArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let config = ExportConfig {
        input: args.input,
        sheet_name: args.sheet,
        output_dir: args.output,
    };
    let summary = sync::export(&config)?;

    println!(
        "exported {} terms ({} quiz questions); skipped {} duplicate and {} incomplete rows",
        summary.total_terms,
        summary.total_questions,
        summary.skipped_duplicates,
        summary.skipped_incomplete
    );
    Ok(())
}

fn execute_quiz(args: QuizArgs) -> Result<()> {
    let config = QuizConfig {
        glossary: args.glossary,
        output_dir: args.output,
        force: args.force,
    };
    let summary = sync::generate_quizzes(&config)?;

    if summary.regenerated {
        println!(
            "generated {} questions across {} packages",
            summary.total_questions, summary.total_packages
        );
    } else {
        println!("quiz packages are up to date");
    }
    Ok(())
}

fn execute_add(args: AddArgs) -> Result<()> {
    if !args.workbook.exists() {
        return Err(ToolError::MissingInput(args.workbook));
    }

    let summary = sync::append_terms(&args.workbook, &args.sheet, &args.terms)?;
    println!(
        "appended {} terms ({} already present)",
        summary.appended, summary.skipped_existing
    );
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Export a crochet glossary workbook into denormalized JSON documents."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export the glossary workbook into the five JSON documents.
    Export(ExportArgs),
    /// Regenerate difficulty-graded quiz packages from glossary.json.
    Quiz(QuizArgs),
    /// Append new terms to the glossary workbook.
    Add(AddArgs),
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Source workbook path.
    #[arg(long)]
    input: PathBuf,

    /// Worksheet holding the glossary rows.
    #[arg(long, default_value = sync::DEFAULT_SHEET)]
    sheet: String,

    /// Directory receiving the JSON documents.
    #[arg(long, default_value = ".")]
    output: PathBuf,
}

#[derive(clap::Args)]
struct QuizArgs {
    /// Previously exported glossary document.
    #[arg(long, default_value = "glossary.json")]
    glossary: PathBuf,

    /// Directory receiving the quiz package files.
    #[arg(long, default_value = "quizzes")]
    output: PathBuf,

    /// Regenerate even when the packages are newer than the glossary.
    #[arg(long)]
    force: bool,
}

#[derive(clap::Args)]
struct AddArgs {
    /// Workbook to append to.
    #[arg(long)]
    workbook: PathBuf,

    /// Worksheet holding the glossary rows.
    #[arg(long, default_value = sync::DEFAULT_SHEET)]
    sheet: String,

    /// JSON file with an array of term objects to add.
    #[arg(long)]
    terms: PathBuf,
}
