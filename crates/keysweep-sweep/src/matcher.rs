//! Candidate extraction from fetched content.
//!
//! Matcher expressions are authored at the job source and may arrive
//! wrapped in pattern-language delimiters with trailing flags
//! (`/sk_live_[0-9a-z]+/gm`). The wrapper is a convenience format and
//! is stripped before compiling; a bare expression passes through
//! unchanged.

use crate::error::{Result, SweepError};
use keysweep_core::Candidate;
use regex::Regex;

/// Extracts candidate substrings from text using a job's matcher
/// expression.
pub struct PatternMatcher;

impl PatternMatcher {
    /// Extract all non-overlapping matches of `matcher_expr` in `text`.
    ///
    /// Returns `Ok(None)` when nothing matches, distinguishing "nothing
    /// found" from "found but empty" for callers.
    ///
    /// # Errors
    /// Returns `BadMatcher` if the expression is empty or does not
    /// compile after the wrapper is stripped. This aborts the job:
    /// every fetched file would fail the same way.
    pub fn extract(text: &str, matcher_expr: &str) -> Result<Option<Vec<Candidate>>> {
        let pattern = normalize_matcher(matcher_expr)?;
        let regex = Regex::new(&pattern).map_err(|e| SweepError::BadMatcher {
            reason: e.to_string(),
        })?;

        let candidates: Vec<Candidate> = regex
            .find_iter(text)
            .map(|m| Candidate::new(m.as_str()))
            .collect();

        if candidates.is_empty() {
            Ok(None)
        } else {
            Ok(Some(candidates))
        }
    }
}

/// Strip `/.../flags` wrapping from a matcher expression.
///
/// Recognized trailing flags are `g`, `m`, `i`, `s`; an `i` flag is
/// carried over as an inline `(?i)`. An expression without the wrapper
/// passes through unchanged. An empty body (`""` or `//`) is rejected:
/// the empty pattern matches at every position and would flood the
/// candidate list with empty strings.
fn normalize_matcher(expr: &str) -> Result<String> {
    let empty = || SweepError::BadMatcher {
        reason: "matcher expression is empty".to_string(),
    };

    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(trimmed.to_string());
    };
    let Some(close) = rest.rfind('/') else {
        return Ok(trimmed.to_string());
    };

    let (body, flags) = rest.split_at(close);
    let flags = &flags[1..];
    if !flags.chars().all(|c| matches!(c, 'g' | 'm' | 'i' | 's')) {
        // Not a flag cluster; the trailing slash belongs to the pattern.
        return Ok(trimmed.to_string());
    }
    if body.is_empty() {
        return Err(empty());
    }

    let mut pattern = String::new();
    if flags.contains('i') {
        pattern.push_str("(?i)");
    }
    if flags.contains('s') {
        pattern.push_str("(?s)");
    }
    pattern.push_str(body);
    Ok(pattern)
}
