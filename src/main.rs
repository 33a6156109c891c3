use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use rlm_usage::analyzer::{AnalysisOptions, LogAnalyzer};
use rlm_usage::config::get_config;
use rlm_usage::logging::init_logging;
use rlm_usage::models::RunSummary;

#[derive(Parser)]
#[command(name = "rlm-usage")]
#[command(about = "Fast RLM report-log analyzer for Imaris floating-license usage")]
#[command(version)]
struct Cli {
    /// RLM report log file to analyze
    log_file: PathBuf,

    /// Directory the report files are written to (defaults to the
    /// configured output directory)
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Overwrite report files that already exist
    #[arg(long)]
    force: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Suppress the run summary
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = get_config();
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| config.output.directory.clone());
    let options = AnalysisOptions {
        force: cli.force || config.output.overwrite,
    };

    let analyzer = LogAnalyzer::new(&cli.log_file, &output_dir);
    match analyzer.run(&options) {
        Ok(summary) => {
            if !cli.quiet {
                print_summary(&summary, cli.json);
            }
            Ok(())
        }
        Err(e) => handle_error(e, cli.json),
    }
}

fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(json_str) => println!("{}", json_str),
            Err(e) => eprintln!("Error serializing summary to JSON: {}", e),
        }
        return;
    }

    println!(
        "{} {}",
        "Analyzed".bright_white().bold(),
        summary.input_file.bright_cyan()
    );
    if !summary.server_name.is_empty() {
        println!("Server: {}", summary.server_name.bright_white());
    }
    println!(
        "{} events • {} products • {} users • {} hosts • {} denials",
        summary.events.to_string().bright_white().bold(),
        summary.products.to_string().bright_white(),
        summary.users.to_string().bright_white(),
        summary.hosts.to_string().bright_white(),
        summary.denials.to_string().bright_yellow()
    );
    println!("\n{}", "Reports written:".bright_white().bold());
    for report in &summary.reports_written {
        println!("  {}", report.bright_green());
    }
}

fn handle_error(e: anyhow::Error, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "error": e.to_string() }));
    } else {
        eprintln!("Error: {}", e);
    }
    process::exit(1);
}
