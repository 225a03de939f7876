//! Approximate lookup of semantically named columns.
//!
//! Sheets exported by hand rarely agree on header spelling, so columns are
//! matched with a positional mismatch count rather than exact names.

use tracing::debug;

use crate::error::AnalysisError;

/// Mismatch budget every analyzer uses for its column lookups.
pub const ANALYZER_MAX_MISMATCHES: usize = 3;

/// Count of differing characters over the common prefix length, plus the
/// difference in length. Not an edit distance: a single inserted character
/// shifts every following position.
pub fn positional_distance(target: &str, header: &str) -> usize {
    let mismatches = target
        .chars()
        .zip(header.chars())
        .filter(|(a, b)| a != b)
        .count();
    mismatches + target.chars().count().abs_diff(header.chars().count())
}

/// Find the header closest to `target`, case-insensitively.
///
/// A header qualifies when its distance is within `max_mismatches`; the
/// smallest distance wins and ties keep the earliest header. With no
/// qualifier, `required` lookups fail with `ColumnNotFound` and optional
/// ones return `None`.
pub fn resolve<S: AsRef<str>>(
    headers: &[S],
    target: &str,
    required: bool,
    max_mismatches: usize,
) -> Result<Option<String>, AnalysisError> {
    if required {
        return require(headers, target, max_mismatches).map(Some);
    }
    Ok(closest_header(headers, &target.to_lowercase(), max_mismatches))
}

/// `resolve` for a column the analysis cannot run without.
pub fn require<S: AsRef<str>>(
    headers: &[S],
    target: &str,
    max_mismatches: usize,
) -> Result<String, AnalysisError> {
    let target = target.to_lowercase();
    closest_header(headers, &target, max_mismatches).ok_or_else(|| {
        AnalysisError::ColumnNotFound {
            available: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            target,
        }
    })
}

fn closest_header<S: AsRef<str>>(
    headers: &[S],
    target: &str,
    max_mismatches: usize,
) -> Option<String> {
    let mut best_match: Option<&str> = None;
    let mut min_mismatches = usize::MAX;

    for header in headers {
        let header = header.as_ref();
        let mismatches = positional_distance(target, &header.to_lowercase());
        if mismatches <= max_mismatches && mismatches < min_mismatches {
            min_mismatches = mismatches;
            best_match = Some(header);
        }
    }

    match best_match {
        Some(header) => {
            debug!(wanted = %target, column = %header, distance = min_mismatches, "Resolved column");
            Some(header.to_string())
        }
        None => {
            debug!(wanted = %target, "No column within budget");
            None
        }
    }
}
