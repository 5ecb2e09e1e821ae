//! Main entry point for the lbxtract CLI application.
//!
//! Every archive named on the command line (or found in a named directory) is
//! extracted into a folder named after it. A failing archive is reported and
//! the remaining ones are still processed.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::Path;

use lbxtract::lbx::{ArchiveReport, ExtractError};
use lbxtract::{Cli, LbxExtractor, collect_archives};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (archives, scan_errors) = collect_archives(&cli.paths).await;
    for e in &scan_errors {
        report_error(e);
    }

    let extractor = LbxExtractor::new(cli.extract_options());
    let batch = extractor.extract_all(&archives).await;

    for (path, result) in &batch.archives {
        match result {
            Ok(report) => print_report(report, &cli),
            Err(e) => report_error_for(path, e),
        }
    }

    let failed = batch.failed() + scan_errors.len();
    if failed > 0 {
        let total = batch.archives.len() + scan_errors.len();
        bail!("{} of {} archive(s) could not be extracted", failed, total);
    }

    Ok(())
}

/// Print what happened to one archive.
///
/// `-q` drops the per-entry lines, `-qq` prints nothing at all.
fn print_report(report: &ArchiveReport, cli: &Cli) {
    if cli.is_very_quiet() {
        return;
    }

    let name = display_name(&report.archive);
    println!(
        "{} is a valid file with {} records",
        name, report.header.entry_count
    );

    if !cli.is_quiet() {
        let verb = if cli.list { "Listing" } else { "Extracting from" };
        println!("{} {}...", verb, name);
        for file in &report.files {
            println!(
                "    {} - {}  -  {} bytes",
                file.path.display(),
                file.description,
                file.len
            );
        }
    }

    if cli.list {
        println!("{} file(s) listed.", report.files.len());
    } else {
        println!("{} file(s) extracted.", report.files.len());
    }
}

fn report_error_for(path: &Path, e: &ExtractError) {
    match e {
        // Decode failures are about the archive, not a filesystem path
        ExtractError::Decode { source, .. } => {
            eprintln!("{}: {}", display_name(path), source);
        }
        ExtractError::Incomplete { written, .. } => {
            report_error(e);
            for file in written {
                eprintln!("  left {}", file.display());
            }
        }
        _ => report_error(e),
    }
}

fn report_error(e: &ExtractError) {
    eprintln!("{}", e);
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
