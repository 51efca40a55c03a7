use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use exif_scrub::pipeline::{self, StripOutcome, format_size};
use exif_scrub::{config, report};

#[derive(Parser, Debug)]
#[command(
    name = "exif-scrub",
    version,
    about = "Inspect and strip EXIF metadata from JPEG/PNG images — view camera, GPS, and timestamp fields, or produce a metadata-free copy"
)]
struct Cli {
    /// Image files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Write metadata-free copies instead of inspecting
    #[arg(long)]
    strip: bool,

    /// Directory for cleaned copies (default: next to each original)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Preview the strip without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON metadata report next to each inspected image
    #[arg(long)]
    export: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    // Load config and apply CLI overrides
    let mut config = config::Config::load(cli.config.as_deref())?;
    if cli.dry_run {
        config.output.dry_run = true;
    }
    if let Some(ref dir) = cli.output_dir {
        config.output.output_dir = Some(dir.to_string_lossy().to_string());
    }

    // Validate inputs
    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    // Collect images
    let images = pipeline::collect_images(&cli.paths);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    log::info!("Found {} image(s) to process", images.len());
    if config.output.dry_run {
        log::info!("DRY RUN — no files will be written");
    }

    if cli.strip {
        run_strip(&images, &config, cli.json)
    } else {
        run_inspect(&images, &config, cli.json, cli.export)
    }
}

/// Inspect each image and print its metadata table (or JSON).
fn run_inspect(
    images: &[PathBuf],
    config: &config::Config,
    json: bool,
    export: bool,
) -> Result<()> {
    let mut json_results = Vec::new();
    let mut failed = 0usize;

    for image_path in images {
        let outcome = match pipeline::inspect_image(image_path, config) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("{e:#}");
                failed += 1;
                continue;
            }
        };

        if json {
            json_results.push(serde_json::json!({
                "path": outcome.path.display().to_string(),
                "basic": outcome.report.basic,
                "exif": outcome.report.exif,
                "has_gps": outcome.report.has_gps_fields(),
            }));
        } else {
            print_metadata_table(&outcome);
        }

        // a failed report write is scoped to this file; the batch goes on
        if export {
            let doc = report::MetadataExport::new(&outcome.attributes, &outcome.report);
            let out = report::export_path(&outcome.path);
            match doc.save(&out) {
                Ok(()) => log::info!("Report written to {}", out.display()),
                Err(e) => {
                    log::error!("{}: {e:#}", outcome.path.display());
                    failed += 1;
                }
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    if failed > 0 {
        log::warn!("{failed} file(s) could not be inspected");
    }
    Ok(())
}

/// Strip each image and report field counts and size deltas.
fn run_strip(images: &[PathBuf], config: &config::Config, json: bool) -> Result<()> {
    let mut results = Vec::new();
    let total = images.len();

    for (i, image_path) in images.iter().enumerate() {
        log::info!("[{}/{}] Stripping: {}", i + 1, total, image_path.display());

        let outcome = pipeline::strip_image(image_path, config);

        if let Some(ref err) = outcome.error {
            log::error!("  Error: {err}");
        } else {
            print_strip_summary(&outcome, config.output.dry_run);
        }

        results.push(outcome);
    }

    // JSON output
    if json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "output_path": r.output_path.as_ref().map(|p| p.display().to_string()),
                    "fields_before": r.fields_before,
                    "fields_after": r.fields_after,
                    "size_before": r.size_before,
                    "size_after": r.size_after,
                    "error": r.error,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary
    let success = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    log::info!("Done: {success} succeeded, {failed} failed out of {total} images");

    Ok(())
}

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Max width for the value column before wrapping.
const VAL_WIDTH: usize = 46;
/// Indent for continuation lines (tag column width + " : " = 25 chars + 2 leading spaces).
const INDENT: &str = "                           ";

/// Print the two-section metadata table for one inspected image.
fn print_metadata_table(outcome: &pipeline::InspectOutcome) {
    println!();
    println!("{BOLD}File:{RESET} {}", outcome.path.display());
    println!("{DIM}{}{RESET}", "═".repeat(72));

    println!("  {BOLD}File Attributes{RESET}");
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    for field in &outcome.report.basic {
        print_row(&field.label, &field.value);
    }
    println!();

    println!("  {BOLD}EXIF{RESET}");
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    if outcome.report.has_exif() {
        for field in &outcome.report.exif {
            print_row(&field.label, &field.value);
        }
    } else {
        println!("  {DIM}(no EXIF metadata found){RESET}");
    }
    println!();

    // Mobile operating systems frequently drop GPS tags on upload/share,
    // so absence deserves a note rather than silence.
    if !outcome.report.has_gps_fields() {
        println!(
            "  {DIM}No GPS fields present — location data may have been \
             stripped before this copy was made.{RESET}"
        );
        println!();
    }
}

/// Print the per-file outcome of a strip.
fn print_strip_summary(outcome: &StripOutcome, dry_run: bool) {
    log::info!(
        "  Metadata fields: {} → {}",
        outcome.fields_before,
        outcome.fields_after
    );
    log::info!(
        "  Size: {} → {}{}",
        format_size(outcome.size_before),
        format_size(outcome.size_after),
        size_delta(outcome.size_before, outcome.size_after)
    );

    if let Some(ref output) = outcome.output_path {
        log::info!("  {GREEN}Cleaned copy:{RESET} {}", output.display());
    } else if dry_run {
        log::info!("  {DIM}(dry run — nothing written){RESET}");
    }
}

/// Signed percentage change, e.g. " (-11.5%)". Empty when the original
/// size is unknown.
fn size_delta(before: u64, after: u64) -> String {
    if before == 0 {
        return String::new();
    }
    let pct = (after as f64 - before as f64) / before as f64 * 100.0;
    format!(" ({pct:+.1}%)")
}

/// Print a single row in the metadata display table.
fn print_row(tag: &str, val: &str) {
    let tag_col = format!("{:<22}", tag);
    let lines = wrap_text(val, VAL_WIDTH);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            println!("  {tag_col} : {line}");
        } else {
            println!("  {INDENT}{line}");
        }
    }
}

/// Wrap text at word boundaries to fit within max_width.
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(s.to_string());
    }

    lines
}
