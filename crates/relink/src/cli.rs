//! Command-line interface definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Documentation link rewriter
///
/// Rewrites internal markdown links (targets under /components, /patterns,
/// /foundation, /examples) into the `{get_link_resource: ...}` tool-call
/// references resolved by the documentation server. Already-rewritten
/// documents are left untouched, so the command is safe to re-run.
///
/// Exit Codes:
///   0  - Documents were processed
///   1  - Generic error occurred
///   2  - Invalid arguments or usage error
///   3  - No documents found to process
///  10  - External dependency failed (file system)
#[derive(Parser)]
#[command(name = "relink")]
#[command(about = "Rewrite internal documentation links into tool-call references", long_about = None)]
pub struct Cli {
    /// Files or glob patterns to process (default: the configured glob)
    pub paths: Vec<String>,

    /// Show what would be changed without modifying any file
    #[arg(long)]
    pub dry_run: bool,

    /// Show detailed processing information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// With --dry-run, print a unified diff of the pending changes
    #[arg(long, requires = "dry_run")]
    pub diff: bool,

    /// Path to the configuration file
    #[arg(long, value_name = "PATH", default_value = "relink.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_flags() {
        let cli = Cli::parse_from(["relink", "--dry-run", "-v", "docs/a.md", "docs/*.md"]);
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert_eq!(cli.paths, vec!["docs/a.md", "docs/*.md"]);
        assert_eq!(cli.config, PathBuf::from("relink.toml"));
    }

    #[test]
    fn diff_requires_dry_run() {
        assert!(Cli::try_parse_from(["relink", "--diff"]).is_err());
        assert!(Cli::try_parse_from(["relink", "--dry-run", "--diff"]).is_ok());
    }
}
