//! Documentation link rewriter
//!
//! Scans documentation files for internal markdown links and rewrites them
//! into `{get_link_resource: ...}` tool-call references, reporting
//! per-document replacement counts and a run summary.
//!
//! # Features
//!
//! - Glob-based document discovery with a configurable default
//! - Pure, idempotent link rewriting (safe to re-run)
//! - Dry-run preview with optional unified diffs
//! - Machine-readable JSON output for automation

use anyhow::Result;
use clap::Parser;
use relink::cli::Cli;
use relink::commands::{CommandExecutor, DocumentOutcome, RunOptions, RunReport, SkipReason};
use relink::config::{Config, ConfigError};
use relink::discover::discover_documents;
use relink::output::{ExitCode, JsonError, JsonOutput, OutputContext};

/// Helper to determine exit code from error type
fn error_to_exit_code(error: &anyhow::Error) -> ExitCode {
    if error.downcast_ref::<glob::PatternError>().is_some() {
        return ExitCode::InvalidArgument;
    }

    if let Some(config_error) = error.downcast_ref::<ConfigError>() {
        return match config_error {
            ConfigError::Read { .. } => ExitCode::ExternalError,
            ConfigError::Parse { .. } => ExitCode::InvalidArgument,
        };
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => ExitCode::NotFound,
            _ => ExitCode::ExternalError,
        };
    }

    ExitCode::GenericError
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let output_ctx = OutputContext::new(cli.quiet, cli.json).with_verbose(cli.verbose);

    let config = Config::load_from_path(&cli.config)?;
    let discovery = discover_documents(&cli.paths, &config)?;

    for missing in &discovery.missing {
        let _ = output_ctx.print_warning(format!("File not found: {}", missing));
    }

    // Non-zero exit only for an empty run: per-document failures below are
    // reported but never change the exit status.
    if discovery.documents.is_empty() {
        if cli.json {
            let err = JsonError::no_documents(&config.default_glob, "relink");
            println!("{}", err.to_json_string()?);
        } else {
            let _ = output_ctx.print_data("No documents found to process.");
        }
        return Ok(ExitCode::NotFound);
    }

    let executor = CommandExecutor::new(RunOptions {
        dry_run: cli.dry_run,
        diff: cli.diff,
    });

    let mode = if cli.dry_run { "DRY RUN - " } else { "" };
    let _ = output_ctx.print_info(format!(
        "{}Processing {} document(s) to replace markdown links with tool call references...",
        mode,
        discovery.documents.len()
    ));

    let mut reports = Vec::with_capacity(discovery.documents.len());
    for path in &discovery.documents {
        let _ = output_ctx.print_detail(format!("Processing: {}", path.display()));
        reports.push(executor.process_document(path));
    }
    let report = RunReport::from_documents(reports, cli.dry_run);

    if cli.json {
        let output = JsonOutput::success(&report, "relink");
        println!("{}", output.to_json_string()?);
        return Ok(ExitCode::Success);
    }

    let status = if cli.dry_run { "Would update" } else { "Updated" };
    for doc in &report.documents {
        match &doc.outcome {
            DocumentOutcome::Updated { links_replaced } => {
                let _ = output_ctx.print_data(format!(
                    "  ✓ {}: {} {} link(s)",
                    doc.path.display(),
                    status,
                    links_replaced
                ));
                if let Some(diff) = &doc.diff {
                    let _ = output_ctx.print_data(diff);
                }
            }
            DocumentOutcome::Unchanged => {
                let _ = output_ctx.print_detail(format!(
                    "  - {}: no internal links found",
                    doc.path.display()
                ));
            }
            DocumentOutcome::Skipped { reason, detail } => match reason {
                SkipReason::WriteFailed => {
                    let _ = output_ctx.print_error(format!("{} (skipped)", detail));
                }
                SkipReason::NotUtf8 | SkipReason::ReadFailed => {
                    let _ = output_ctx.print_warning(format!("{} (skipped)", detail));
                }
            },
        }
    }

    let would = if cli.dry_run { "that would be " } else { "" };
    let summary = &report.summary;
    let _ = output_ctx.print_info("");
    let _ = output_ctx.print_info("Summary:");
    let _ = output_ctx.print_info(format!(
        "  Documents {}updated: {}",
        would, summary.documents_updated
    ));
    let _ = output_ctx.print_info(format!(
        "  Links {}replaced: {}",
        would, summary.links_replaced
    ));
    if summary.documents_skipped > 0 {
        let _ = output_ctx.print_info(format!(
            "  Documents skipped: {}",
            summary.documents_skipped
        ));
    }

    if !cli.dry_run && summary.links_replaced > 0 {
        print_change_sample(&report, &output_ctx);
    }

    Ok(ExitCode::Success)
}

/// Show up to five rewritten lines so the operator can eyeball the result.
fn print_change_sample(report: &RunReport, output_ctx: &OutputContext) {
    const SAMPLE_LIMIT: usize = 5;

    let mut shown = 0;
    let mut header_printed = false;
    for doc in &report.documents {
        if !matches!(doc.outcome, DocumentOutcome::Updated { .. }) {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&doc.path) else {
            continue;
        };
        for (line_no, line) in content.lines().enumerate() {
            if !line.contains("{get_link_resource:") {
                continue;
            }
            if !header_printed {
                let _ = output_ctx.print_info("\nSample of changes made:");
                header_printed = true;
            }
            let _ = output_ctx.print_info(format!(
                "  {}:{}: {}",
                doc.path.display(),
                line_no + 1,
                line.trim()
            ));
            shown += 1;
            if shown >= SAMPLE_LIMIT {
                return;
            }
        }
    }
}
