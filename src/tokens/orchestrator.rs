use super::fixer::Fixer;
use super::report::{self, ReportFormat};
use super::scanner::{self, ScanOptions, ScanOutcome};
use super::walk;
use crate::config::TokensConfig;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, error, info, trace, warn};

/// Options for a verify run
#[derive(Debug, Clone)]
pub struct VerifyOptions<'a> {
    pub format: ReportFormat,
    pub output: Option<&'a str>,
    /// Only list the files that would be scanned
    pub dry_run: bool,
}

/// Scan the configured roots and report violations.
///
/// Returns `true` when no violations were found.
pub fn verify(config: &TokensConfig, base: &Path, opts: &VerifyOptions) -> anyhow::Result<bool> {
    // Output extension is checked before scanning
    let format = match opts.output {
        Some(path) => ReportFormat::from_output_path(path)?,
        None => opts.format,
    };

    let files = walk::collect_files(config, base)?;
    info!("Found {} files to scan", files.len());

    if opts.dry_run {
        info!("Dry run - {} files would be scanned:", files.len());
        for file in &files {
            info!("  {}", file.display);
        }
        return Ok(true);
    }

    let scan_opts = ScanOptions::from_config(config)?;
    let outcome = scanner::scan_files(&files, &scan_opts);
    debug!(
        "Scanned {} files, {} violations",
        outcome.files_scanned,
        outcome.violations.len()
    );
    trace!("Violations: {:?}", outcome.violations);

    if !outcome.unreadable.is_empty() {
        warn!("{} files could not be read", outcome.unreadable.len());
    }

    let rendered = report::render(format, &outcome)?;
    match opts.output {
        Some(path) => write_output(path, &rendered)?,
        None => report::print_report(&rendered),
    }

    if outcome.violations.is_empty() {
        return Ok(true);
    }
    error!(
        "{} design-token violations found",
        outcome.violations.len()
    );
    Ok(false)
}

/// Rewrite fixable inline-style literals, then report what is left.
///
/// Returns `true` when no inline-style violations remain.
pub fn fix(config: &TokensConfig, base: &Path, dry_run: bool, verbose: bool) -> anyhow::Result<bool> {
    let files = walk::collect_files(config, base)?;
    info!("Found {} files to fix", files.len());

    let fixer = Fixer::new(config)?;
    let outcome = fixer.fix_files(&files, dry_run, verbose)?;

    if dry_run {
        info!(
            "Dry run - {} changes in {} files, nothing written",
            outcome.changes, outcome.files_changed
        );
    } else {
        info!(
            "Applied {} changes in {} files",
            outcome.changes, outcome.files_changed
        );
    }

    if outcome.remaining.is_empty() {
        info!("No unfixable inline-style values left");
        return Ok(true);
    }

    let remaining = ScanOutcome {
        violations: outcome.remaining,
        files_scanned: outcome.files_scanned,
        unreadable: vec![],
    };
    warn!(
        "{} inline-style values need a manual fix",
        remaining.violations.len()
    );
    report::print_report(&report::format_text(&remaining));
    Ok(false)
}

fn write_output(path: &str, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write output file {}", path))?;
    info!("Results written to {}", path);
    Ok(())
}
