//! Name patterns
//!
//! Lookups and deletes take a shell-style glob over normalized names:
//! - `*` matches any run of characters (including none)
//! - `?` matches exactly one character
//! - `[...]` matches one character from a class (in-memory store only)
//!
//! An empty pattern or a lone `*` selects every contact. A pattern without
//! wildcard characters is an exact key lookup. Runs of `*` collapse to one,
//! so `jo**` means the same as `jo*`.

use glob::Pattern;

use crate::contact::normalize;
use crate::error::{BookError, Result};

/// Escape character used in generated `LIKE` expressions
pub const LIKE_ESCAPE: char = '\\';

/// A parsed name pattern
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// Every contact
    All,

    /// A single normalized name
    Exact(String),

    /// A compiled glob and the normalized text it came from
    Glob { source: String, pattern: Pattern },
}

impl NamePattern {
    /// Normalize and classify a raw pattern
    pub fn parse(raw: &str) -> Result<Self> {
        let source = collapse_stars(&normalize(raw));

        if source.is_empty() || source == "*" {
            return Ok(NamePattern::All);
        }

        if !has_wildcard(&source) {
            return Ok(NamePattern::Exact(source));
        }

        let pattern = Pattern::new(&source).map_err(|e| {
            BookError::InvalidArgument(format!("invalid name pattern {}: {}", source, e))
        })?;

        Ok(NamePattern::Glob { source, pattern })
    }

    /// The normalized pattern text
    pub fn as_str(&self) -> &str {
        match self {
            NamePattern::All => "*",
            NamePattern::Exact(name) => name,
            NamePattern::Glob { source, .. } => source,
        }
    }

    /// Does `name` (already normalized) match?
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::All => true,
            NamePattern::Exact(exact) => exact == name,
            NamePattern::Glob { pattern, .. } => pattern.matches(name),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, NamePattern::All)
    }

    /// Translate to a SQL `LIKE` expression (to be used with
    /// `ESCAPE '\'`).
    ///
    /// `*` becomes `%`, `?` becomes `_`, and literal `%`, `_` and `\` are
    /// escaped. Character classes have no `LIKE` equivalent and are
    /// rejected.
    pub fn to_sql_like(&self) -> Result<String> {
        let source = match self {
            NamePattern::All => return Ok("%".to_string()),
            NamePattern::Exact(name) => name,
            NamePattern::Glob { source, .. } => source,
        };

        let mut like = String::with_capacity(source.len() + 4);
        for ch in source.chars() {
            match ch {
                '*' => like.push('%'),
                '?' => like.push('_'),
                '[' => {
                    return Err(BookError::InvalidArgument(format!(
                        "character classes are not supported by the relational store: {}",
                        source
                    )));
                }
                '%' | '_' | LIKE_ESCAPE => {
                    like.push(LIKE_ESCAPE);
                    like.push(ch);
                }
                _ => like.push(ch),
            }
        }

        Ok(like)
    }
}

/// Whether `s` contains a glob metacharacter
pub fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Reject contact names that could not be looked up by exact name
///
/// `name` must already be normalized. Any of `*`, `?`, `[` or `]` would be
/// read back as pattern syntax.
pub fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BookError::InvalidArgument("contact name is empty".to_string()));
    }

    if name.contains(['*', '?', '[', ']']) {
        return Err(BookError::InvalidArgument(format!(
            "contact name {} contains pattern characters (*, ?, [, ])",
            name
        )));
    }

    Ok(())
}

// `glob` treats `**` as a path-component wildcard and rejects it elsewhere
fn collapse_stars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_star = false;
    for ch in s.chars() {
        if ch == '*' && prev_star {
            continue;
        }
        prev_star = ch == '*';
        out.push(ch);
    }
    out
}
