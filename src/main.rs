use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use branch_splitter::{BatchPipeline, SplitterConfig};

#[derive(Parser)]
#[command(name = "branch-splitter")]
#[command(about = "Split report screenshots into one headed image per branch")]
struct Cli {
    /// Directory holding the header image and the screenshots
    #[arg(value_name = "WORKING_DIR")]
    working_dir: Option<PathBuf>,

    /// File name of the header image inside the working directory
    #[arg(long, value_name = "NAME")]
    header: Option<String>,

    /// Where reports are written (default: <WORKING_DIR>/Final_WhatsApp_Reports)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Date label to stamp instead of today's date
    #[arg(long, value_name = "LABEL")]
    date: Option<String>,

    /// TrueType font for the date label
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => SplitterConfig::from_file(path)?,
        None => SplitterConfig::default(),
    };
    if let Some(dir) = args.working_dir {
        config.working_dir = dir;
    }
    if let Some(header) = args.header {
        config.header_name = header;
    }
    if let Some(output) = args.output {
        config.output_dir = Some(output);
    }
    if let Some(font) = args.font {
        config.label.font_path = Some(font);
    }

    let mut pipeline = BatchPipeline::new(config);
    if let Some(date) = args.date {
        pipeline = pipeline.with_date_label(date);
    }
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let report = pipeline.run()?;

    println!("\n=== Batch Results ===");
    println!("Reports produced: {}", report.produced);

    if report.failure_count() > 0 {
        println!("\nFailed images:");
        for (source, error) in report.failures() {
            println!("  {}: {}", source.display(), error);
        }
    }

    Ok(())
}
