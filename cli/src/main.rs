//! sheetsum CLI - workbook consolidation and delay analysis
//!
//! A command-line tool that merges month-year sheets of an XLSX workbook and
//! reports incident-type counts and stage-to-stage delay averages.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use sheetsum::render::{self, JsonFormat};
use sheetsum::{is_month_year, Report};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Workbook consolidation and incident delay analysis
#[derive(Parser)]
#[command(
    name = "sheetsum",
    version,
    about = "Consolidate month-year workbook sheets and analyze incident delays",
    long_about = "sheetsum - workbook consolidation and incident delay analysis.\n\n\
                  Merges every sheet named like 'March 2025' into one table and reports\n\
                  incident-type counts and average forwarding delays, overall and per month."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and print the report
    Report {
        /// Input workbook path (.xlsx)
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(long, default_value = "text")]
        format: ReportFormat,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show workbook information: sheets and which ones match
    Info {
        /// Input workbook path (.xlsx)
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Report output format
#[derive(Clone, ValueEnum)]
enum ReportFormat {
    /// Plain text with ASCII charts
    Text,
    /// Markdown tables
    Markdown,
    /// Structured JSON
    Json,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Report {
            input,
            output,
            format,
            compact,
        } => {
            let pb = create_spinner("Parsing workbook...");
            let report = sheetsum::analyze_file(&input)?;
            pb.set_message("Rendering report...");

            let rendered = match format {
                ReportFormat::Text => render::to_text(&report)?,
                ReportFormat::Markdown => render::to_markdown(&report)?,
                ReportFormat::Json => {
                    let json_format = if compact {
                        JsonFormat::Compact
                    } else {
                        JsonFormat::Pretty
                    };
                    render::to_json(&report, json_format)?
                }
            };

            pb.finish_and_clear();
            print_status(&report);
            write_output(output.as_ref(), &rendered)?;

            if let Some(path) = output {
                println!(
                    "{} Report written to {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Parsing workbook...");
            let workbook = sheetsum::open_workbook(&input)?;
            pb.finish_and_clear();

            println!("{}", "Workbook Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Sheets".bold(), workbook.sheets.len());
            println!();

            for sheet in &workbook.sheets {
                let marker = if is_month_year(&sheet.name) {
                    "✓".green().bold().to_string()
                } else {
                    "·".dimmed().to_string()
                };
                println!(
                    "{} {} ({} rows, {} columns)",
                    marker,
                    sheet.name,
                    sheet.rows.len(),
                    sheet.columns.len()
                );
            }

            let matching = workbook
                .sheets
                .iter()
                .filter(|s| is_month_year(&s.name))
                .count();
            println!();
            if matching > 0 {
                println!(
                    "{} {} of {} sheets match the 'Month Year' pattern",
                    "✓".green().bold(),
                    matching,
                    workbook.sheets.len()
                );
            } else {
                println!(
                    "{} No sheets match the 'Month Year' pattern",
                    "!".yellow().bold()
                );
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Merge count and warnings, printed to stderr before the report body.
fn print_status(report: &Report) {
    if report.sheets_merged.is_empty() {
        eprintln!(
            "{} No sheets matching the 'Month Year' pattern were found",
            "!".yellow().bold()
        );
        return;
    }

    eprintln!(
        "{} Consolidated {} sheets",
        "✓".green().bold(),
        report.sheets_merged.len()
    );
    for warning in &report.warnings {
        eprintln!("{} {}", "!".yellow().bold(), warning);
    }
}

fn print_version() {
    println!("{} {}", "sheetsum".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Workbook consolidation and incident delay analysis");
    println!();
    println!("Supported input: XLSX workbooks with 'Month Year' sheet names");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
