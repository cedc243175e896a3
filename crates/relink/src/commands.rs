//! Command execution logic for a rewrite run.
//!
//! The `CommandExecutor` owns the per-document policy: read each document,
//! apply the rewriter, write back unless previewing, and fold the outcomes
//! into a run report. No single document failure aborts the run; failures
//! become `Skipped` outcomes so the remaining documents still process.

use crate::rewrite::LinkRewriter;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Options controlling a rewrite run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Report what would change without writing any file.
    pub dry_run: bool,
    /// Attach a unified diff to each changed document (dry-run preview).
    pub diff: bool,
}

/// Outcome of processing a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Qualifying links were found (and written back unless dry-run).
    Updated { links_replaced: usize },
    /// No qualifying links; the file was left untouched.
    Unchanged,
    /// The document was skipped; the run continued without it.
    Skipped { reason: SkipReason, detail: String },
}

/// Why a document was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Content is not valid UTF-8.
    NotUtf8,
    /// The document could not be read.
    ReadFailed,
    /// The rewritten text could not be written back.
    WriteFailed,
}

/// Report for one processed document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
    /// Unified diff of the pending change (dry-run with diff enabled only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl DocumentReport {
    fn new(path: &Path, outcome: DocumentOutcome) -> Self {
        Self {
            path: path.to_path_buf(),
            outcome,
            diff: None,
        }
    }
}

/// Aggregated counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub documents_scanned: usize,
    pub documents_updated: usize,
    pub documents_skipped: usize,
    pub links_replaced: usize,
}

/// Full report for a rewrite run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub documents: Vec<DocumentReport>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Fold per-document reports into a report with aggregated counters.
    pub fn from_documents(documents: Vec<DocumentReport>, dry_run: bool) -> Self {
        let mut summary = RunSummary::default();
        for doc in &documents {
            summary.documents_scanned += 1;
            match &doc.outcome {
                DocumentOutcome::Updated { links_replaced } => {
                    summary.documents_updated += 1;
                    summary.links_replaced += links_replaced;
                }
                DocumentOutcome::Unchanged => {}
                DocumentOutcome::Skipped { .. } => summary.documents_skipped += 1,
            }
        }
        Self {
            dry_run,
            documents,
            summary,
        }
    }
}

/// Executes a rewrite run over a set of documents.
pub struct CommandExecutor {
    rewriter: LinkRewriter,
    options: RunOptions,
}

impl CommandExecutor {
    /// Executor with the builtin prefixes and the given options.
    pub fn new(options: RunOptions) -> Self {
        Self::with_rewriter(LinkRewriter::new(), options)
    }

    /// Executor with a custom rewriter.
    pub fn with_rewriter(rewriter: LinkRewriter, options: RunOptions) -> Self {
        Self { rewriter, options }
    }

    /// Whether this executor previews instead of writing.
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Process every document in order and fold outcomes into a report.
    pub fn process_all(&self, documents: &[PathBuf]) -> RunReport {
        let reports = documents
            .iter()
            .map(|path| self.process_document(path))
            .collect();
        RunReport::from_documents(reports, self.options.dry_run)
    }

    /// Process one document.
    ///
    /// Never returns an error: read and write failures become `Skipped`
    /// outcomes so callers can keep going with the remaining documents.
    pub fn process_document(&self, path: &Path) -> DocumentReport {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return DocumentReport::new(
                    path,
                    DocumentOutcome::Skipped {
                        reason: SkipReason::NotUtf8,
                        detail: format!("could not read {} as UTF-8", path.display()),
                    },
                );
            }
            Err(e) => {
                return DocumentReport::new(
                    path,
                    DocumentOutcome::Skipped {
                        reason: SkipReason::ReadFailed,
                        detail: format!("failed to read {}: {}", path.display(), e),
                    },
                );
            }
        };

        let rewritten = self.rewriter.rewrite(&content);
        if !rewritten.changed() {
            return DocumentReport::new(path, DocumentOutcome::Unchanged);
        }

        let diff = (self.options.dry_run && self.options.diff)
            .then(|| render_diff(&content, &rewritten.text));

        if !self.options.dry_run {
            if let Err(e) = fs::write(path, rewritten.text.as_bytes()) {
                return DocumentReport::new(
                    path,
                    DocumentOutcome::Skipped {
                        reason: SkipReason::WriteFailed,
                        detail: format!("failed to write {}: {}", path.display(), e),
                    },
                );
            }
        }

        DocumentReport {
            path: path.to_path_buf(),
            outcome: DocumentOutcome::Updated {
                links_replaced: rewritten.replaced,
            },
            diff,
        }
    }
}

/// Render a unified diff between the original and rewritten content.
fn render_diff(original: &str, rewritten: &str) -> String {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(original, rewritten);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(&format!("{}{}", sign, change));
    }
    out
}
