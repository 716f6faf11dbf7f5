// ============================================================================
// 🧽 img-scrub CLI
// ============================================================================
//
// Re-encode every JPEG in a folder into another folder with all metadata
// removed, or audit a folder for leftover EXIF/XMP/ICC/IPTC segments.
//
// Usage:
//   img-scrub run ./photos ./photos-clean
//   img-scrub run -q 70 --order name --auto-orient ./photos ./out
//   img-scrub inspect ./photos-clean
//
// ============================================================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use img_scrub::{
    inspect_directory, join, spawn, BarSink, CancelToken, InspectReport, JobConfig, ProgressSink,
    Quality, SortStrategy,
};
use serde_json::json;
use shared_utils::logging::{init_logging, LogConfig};
use shared_utils::{create_progress_bar, print_summary_report};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;
use tracing::{info, Level};

const EXIT_FAILURES: i32 = 1;
const EXIT_CANCELLED: i32 = 130;

#[derive(Parser)]
#[command(name = "img-scrub")]
#[command(version, about = "Strip metadata from JPEG folders by re-encoding", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-encode every JPEG in INPUT into OUTPUT without metadata
    Run {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// JPEG quality (10-100)
        #[arg(short, long, default_value_t = Quality::DEFAULT as i64, allow_negative_numbers = true)]
        quality: i64,

        /// Processing order
        #[arg(long, value_enum, default_value = "listing")]
        order: Order,

        /// Apply the EXIF orientation to the pixels before it is dropped
        #[arg(long)]
        auto_orient: bool,

        /// No progress bar, no header
        #[arg(long)]
        quiet: bool,

        /// Debug-level log file, info-level stderr
        #[arg(short, long)]
        verbose: bool,

        #[arg(short = 'o', long = "output", value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List JPEGs in DIR that still carry metadata
    Inspect {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(short = 'o', long = "output", value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Order {
    /// As the directory listing returns them
    Listing,
    Name,
    Size,
}

impl From<Order> for SortStrategy {
    fn from(order: Order) -> Self {
        match order {
            Order::Listing => SortStrategy::None,
            Order::Name => SortStrategy::NameAscending,
            Order::Size => SortStrategy::SizeAscending,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            quality,
            order,
            auto_orient,
            quiet,
            verbose,
            format,
        } => {
            setup_logging(verbose);
            let config = JobConfig::new(input, output, Quality::new(quality)?)?
                .with_order(order.into())
                .with_auto_orient(auto_orient);
            let code = run_command(config, quiet, format)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Inspect { dir, format } => {
            setup_logging(false);
            let reports = inspect_directory(&dir, SortStrategy::NameAscending)?;
            if !print_inspection(&reports, format)? {
                std::process::exit(EXIT_FAILURES);
            }
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let config = if verbose {
        LogConfig::default()
            .with_level(Level::DEBUG)
            .with_stderr_level(Level::INFO)
    } else {
        LogConfig::default()
    };
    // 日志失败不影响处理
    if let Err(e) = init_logging("img_scrub", config) {
        eprintln!("⚠️  Logging disabled: {:#}", e);
    }
}

fn print_header(config: &JobConfig) -> Result<()> {
    let term = Term::stdout();
    term.write_line("╔══════════════════════════════════════════════╗")?;
    term.write_line("║   🧽 img-scrub: JPEG Metadata Scrubber       ║")?;
    term.write_line("╚══════════════════════════════════════════════╝")?;
    term.write_line("")?;
    term.write_line(&format!("📁 Input:   {}", style(config.input_dir().display()).cyan()))?;
    term.write_line(&format!("📂 Output:  {}", style(config.output_dir().display()).cyan()))?;
    term.write_line(&format!("🎚️  Quality: {}", style(config.quality()).green()))?;
    if config.auto_orient() {
        term.write_line(&format!("🔄 Orientation: {}", style("applied to pixels").yellow()))?;
    }
    term.write_line("")?;
    Ok(())
}

/// Runs the batch on a worker and drives the progress bar from the main
/// thread. Returns the process exit code.
fn run_command(config: JobConfig, quiet: bool, format: OutputFormat) -> Result<i32> {
    let human = format == OutputFormat::Human;
    if human && !quiet {
        print_header(&config)?;
    }

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\n⚠️  Cancelling after the current file...");
        handler_token.cancel();
    })
    .context("Failed to install Ctrl-C handler")?;

    let start = Instant::now();
    let (tx, rx) = mpsc::channel();
    let handle = spawn(config.clone(), tx, cancel).context("Failed to start batch worker")?;

    let mut sink = BarSink::new(create_progress_bar(0, "🧽 Scrub", quiet || !human));
    for event in rx {
        sink.on_event(event);
    }

    let result = join(handle)?;
    let elapsed = start.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "Run finished");

    match format {
        OutputFormat::Human => {
            if result.total == 0 {
                println!("{}", style("No JPEG files found in input folder.").yellow());
            } else if quiet {
                shared_utils::print_simple_summary(&result);
            } else {
                print_summary_report(&result, elapsed, "Metadata Scrub");
            }
        }
        OutputFormat::Json => {
            let value = json!({
                "config": config,
                "result": result,
                "elapsed_secs": elapsed.as_secs_f64(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(if result.cancelled {
        EXIT_CANCELLED
    } else if result.failed > 0 {
        EXIT_FAILURES
    } else {
        0
    })
}

/// Prints the audit. Returns true when every file is confirmed clean.
fn print_inspection(reports: &[InspectReport], format: OutputFormat) -> Result<bool> {
    let clean = reports
        .iter()
        .all(|r| !r.has_metadata() && r.error.is_none());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reports)?);
        }
        OutputFormat::Human => {
            if reports.is_empty() {
                println!("{}", style("No JPEG files found.").yellow());
                return Ok(true);
            }
            for report in reports {
                let name = report.file.file_name().unwrap_or_default().to_string_lossy();
                if let Some(ref error) = report.error {
                    println!("  {} {} ({})", style("❌").red(), name, style(error).dim());
                } else if report.has_metadata() {
                    println!(
                        "  {} {} [{}]",
                        style("⚠️").yellow(),
                        name,
                        style(report.kinds_label()).yellow()
                    );
                } else {
                    println!("  {} {}", style("✅").green(), name);
                }
            }
            let dirty = reports.iter().filter(|r| r.has_metadata()).count();
            println!();
            println!(
                "📊 {} file(s) inspected, {} with metadata",
                reports.len(),
                style(dirty).bold()
            );
        }
    }

    Ok(clean)
}
