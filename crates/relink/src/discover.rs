//! Document discovery from paths, glob patterns, and the configured default.
//!
//! Discovery is deterministic: the resulting document list is sorted and
//! de-duplicated regardless of argument order or glob expansion order.

use crate::config::Config;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Outcome of expanding the command-line path arguments.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Documents to process, sorted and de-duplicated.
    pub documents: Vec<PathBuf>,
    /// Arguments that named a file that does not exist.
    pub missing: Vec<String>,
}

/// Expand path and glob arguments into a document list.
///
/// Arguments containing glob metacharacters are expanded with the `glob`
/// crate; plain paths are taken as-is when they exist and recorded in
/// [`Discovery::missing`] otherwise. With no arguments, the configured
/// default glob is used. An invalid glob pattern is an error; a missing
/// plain path is not, so one bad argument cannot abort the run.
pub fn discover_documents(args: &[String], config: &Config) -> Result<Discovery> {
    let mut documents = BTreeSet::new();
    let mut missing = Vec::new();

    if args.is_empty() {
        expand_glob(&config.default_glob, &mut documents)
            .with_context(|| format!("invalid default glob '{}'", config.default_glob))?;
    } else {
        for arg in args {
            if is_glob(arg) {
                expand_glob(arg, &mut documents)
                    .with_context(|| format!("invalid glob pattern '{}'", arg))?;
            } else {
                let path = PathBuf::from(arg);
                if path.is_file() {
                    documents.insert(path);
                } else {
                    missing.push(arg.clone());
                }
            }
        }
    }

    Ok(Discovery {
        documents: documents.into_iter().collect(),
        missing,
    })
}

fn is_glob(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

fn expand_glob(pattern: &str, documents: &mut BTreeSet<PathBuf>) -> Result<()> {
    // Unreadable directories during expansion are skipped, not fatal.
    for path in glob::glob(pattern)?.flatten() {
        if path.is_file() {
            documents.insert(path);
        }
    }
    Ok(())
}
