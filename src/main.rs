use std::path::PathBuf;

use clap::{Parser, Subcommand};
use confsync::report::Report;
use confsync::sync;
use confsync::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Export(args) => execute_export(args),
        Command::Import(args) => execute_import(args),
    }
}

fn execute_export(args: ExportArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let summary = sync::json_to_excel(&args.input, &args.output)?;
    println!("Workbook written to {}", args.output.display());
    println!("  {} participants", summary.participants);
    println!(
        "  {} sessions with {} papers",
        summary.sessions, summary.papers
    );
    println!("  {} events", summary.events);
    println!("  {} screening slots", summary.screening_slots);
    Ok(())
}

fn execute_import(args: ImportArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }
    if !args.original.exists() {
        return Err(ToolError::MissingInput(args.original));
    }

    let report = sync::excel_to_json(&args.input, &args.original, &args.output)?;
    println!("Updated JSON written to {}", args.output.display());
    print_report(&report);
    Ok(())
}

fn print_report(report: &Report) {
    if !report.new_participants().is_empty() {
        println!("New participants ({}):", report.new_participants().len());
        for participant in report.new_participants() {
            match &participant.institution {
                Some(institution) => println!("  + {} ({institution})", participant.name),
                None => println!("  + {} (no institution)", participant.name),
            }
        }
        let missing: Vec<&str> = report.missing_institutions().collect();
        if !missing.is_empty() {
            println!(
                "Consider adding institutions in the Participants sheet for: {}",
                missing.join(", ")
            );
        }
    }

    if !report.warnings().is_empty() {
        println!("Warnings ({}):", report.warnings().len());
        for warning in report.warnings() {
            println!("  - {warning}");
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Round-trip a conference programme between JSON and an editable Excel workbook."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Flatten the programme JSON into the four-sheet workbook.
    Export(ExportArgs),
    /// Reconcile an edited workbook back into the programme JSON.
    Import(ImportArgs),
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Programme JSON input path.
    #[arg(long, default_value = "conference-data.json")]
    input: PathBuf,

    /// Workbook output path.
    #[arg(long, default_value = "conference-data.xlsx")]
    output: PathBuf,
}

#[derive(clap::Args)]
struct ImportArgs {
    /// Edited workbook input path.
    #[arg(long, default_value = "conference-data.xlsx")]
    input: PathBuf,

    /// Original programme JSON, used to recover fields the workbook cannot carry.
    #[arg(long, default_value = "conference-data.json")]
    original: PathBuf,

    /// Updated programme JSON output path.
    #[arg(long, default_value = "conference-data-updated.json")]
    output: PathBuf,
}
