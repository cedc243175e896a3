//! Internal link rewriting.
//!
//! Turns markdown links that target internal documentation paths into the
//! `{get_link_resource: ...}` tool-call references resolved by the
//! documentation server. The pass is a pure function over the document text:
//! it never touches the filesystem and is deterministic for a given input.

use regex::Regex;
use std::borrow::Cow;
use thiserror::Error;

/// Path prefixes that mark a link target as internal documentation.
///
/// Matched case-sensitively as literal words immediately after the leading
/// `/` of the link target.
pub const INTERNAL_PREFIXES: [&str; 4] = ["components", "patterns", "foundation", "examples"];

/// Errors from constructing a [`LinkRewriter`] with a custom prefix list.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The prefix list was empty.
    #[error("at least one path prefix is required")]
    NoPrefixes,
    /// The prefix list did not produce a compilable pattern.
    #[error("prefix list does not form a valid pattern: {source}")]
    InvalidPrefixes { source: regex::Error },
}

/// Result of one rewriting pass over a document.
#[derive(Debug)]
pub struct Rewritten<'a> {
    /// The rewritten text. Borrows the input when nothing matched.
    pub text: Cow<'a, str>,
    /// Number of links replaced.
    pub replaced: usize,
}

impl Rewritten<'_> {
    /// True if at least one link was replaced.
    pub fn changed(&self) -> bool {
        self.replaced > 0
    }
}

/// Rewrites internal markdown links into tool-call references.
///
/// A qualifying link has the shape `[text](/prefix...)` where `prefix` is one
/// of the configured prefix words. Link text stops at the first `]` and the
/// target at the first `)`; nested brackets and parenthesized paths are
/// deliberately unsupported. Everything else in the document, including links
/// to other prefixes and already-rewritten tool-call references, passes
/// through byte-for-byte.
///
/// # Examples
///
/// ```
/// use relink::rewrite::LinkRewriter;
///
/// let rewriter = LinkRewriter::new();
/// let out = rewriter.rewrite("See [Button](/components/button/usage.md) for details.");
/// assert_eq!(
///     out.text,
///     "See [Button]({get_link_resource: /components/button/usage.md}) for details."
/// );
/// assert_eq!(out.replaced, 1);
/// ```
pub struct LinkRewriter {
    pattern: Regex,
}

impl LinkRewriter {
    /// Rewriter for the builtin prefixes in [`INTERNAL_PREFIXES`].
    pub fn new() -> Self {
        Self {
            pattern: compile_pattern(&INTERNAL_PREFIXES)
                .expect("builtin prefix pattern should compile"),
        }
    }

    /// Rewriter for a custom prefix list.
    pub fn with_prefixes(prefixes: &[&str]) -> Result<Self, RewriteError> {
        Ok(Self {
            pattern: compile_pattern(prefixes)?,
        })
    }

    /// Rewrite every qualifying link in `content`.
    ///
    /// Total over any input: there is no failure case. Applying the rewriter
    /// to its own output is a no-op, because the tool-call target no longer
    /// begins with `/` and so no longer matches the link pattern.
    pub fn rewrite<'a>(&self, content: &'a str) -> Rewritten<'a> {
        let mut replaced = 0;
        let text = self.pattern.replace_all(content, |caps: &regex::Captures| {
            replaced += 1;
            format!("[{}]({{get_link_resource: {}}})", &caps[1], &caps[2])
        });
        Rewritten { text, replaced }
    }
}

impl Default for LinkRewriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the link pattern for a prefix list.
///
/// - link text: `[^\]]*` (may be empty)
/// - link target: `/` + prefix word + `[^)]*` (tail may be empty)
fn compile_pattern(prefixes: &[&str]) -> Result<Regex, RewriteError> {
    if prefixes.is_empty() {
        return Err(RewriteError::NoPrefixes);
    }
    let alternation = prefixes
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"\[([^\]]*)\]\((/(?:{})[^)]*)\)", alternation);
    Regex::new(&pattern).map_err(|source| RewriteError::InvalidPrefixes { source })
}
