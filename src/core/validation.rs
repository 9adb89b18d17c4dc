//! Input validation utilities
//!
//! Pure checks over user input, run before any backend call:
//! - YouTube URL shape validation (bare path, `watch?v=`, short links)
//! - Format id membership in a listing
//! - Collection selection syntax (`all`, `1,3-5`)
//! - Container choice parsing

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::download::types::{ContainerKind, FormatTable};

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// URL does not match any accepted YouTube shape
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    /// Nothing was entered where a value is required
    #[error("Input cannot be empty")]
    EmptyInput,

    /// A selection token is neither a number nor a `a-b` range
    #[error("Invalid selection token '{0}'")]
    InvalidToken(String),

    /// Range whose start is greater than its end
    #[error("Reversed range {start}-{end}")]
    ReversedRange { start: usize, end: usize },

    /// 1-based index outside the listed entries
    #[error("Index {index} is out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },

    /// Container choice that is neither a listed number nor a known name
    #[error("Invalid container choice '{0}'")]
    InvalidChoice(String),
}

/// Literal selecting every collection member
pub const SELECT_ALL: &str = "all";

/// Accepted URL shapes, any scheme/`www.` prefix.
static URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(https?://)?(www\.)?(youtube\.com|youtu\.?be)/.+$",
        r"^(https?://)?(www\.)?youtube\.com/watch\?v=[\w-]+",
        r"^(https?://)?(www\.)?youtu\.be/[\w-]+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("url pattern is valid"))
    .collect()
});

/// Returns `true` if `url` has one of the accepted YouTube shapes.
///
/// # Examples
/// ```
/// use ytrelay::core::validation::validate_resource_url;
///
/// assert!(validate_resource_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
/// assert!(validate_resource_url("youtu.be/dQw4w9WgXcQ"));
/// assert!(!validate_resource_url("https://evil.com/watch?v=dQw4w9WgXcQ"));
/// assert!(!validate_resource_url(""));
/// ```
pub fn validate_resource_url(url: &str) -> bool {
    URL_PATTERNS.iter().any(|re| re.is_match(url))
}

/// Same check as [`validate_resource_url`], as a `Result` for `?` call sites.
pub fn ensure_resource_url(url: &str) -> Result<(), ValidationError> {
    if validate_resource_url(url) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl(url.to_string()))
    }
}

/// Membership test; unknown ids are `false`, never an error.
pub fn is_selection_valid(available: &FormatTable, selected: &str) -> bool {
    available.contains(selected)
}

/// Parses the collection selection syntax into sorted, deduplicated 0-based indices.
///
/// Accepts `all` (case-insensitive) or a comma-separated list of 1-based
/// numbers and inclusive `a-b` ranges. Any index outside `1..=len` rejects
/// the whole input.
///
/// # Examples
/// ```
/// use ytrelay::core::validation::parse_selection;
///
/// assert_eq!(parse_selection("all", 3).unwrap(), vec![0, 1, 2]);
/// assert_eq!(parse_selection("1,3-5", 5).unwrap(), vec![0, 2, 3, 4]);
/// assert!(parse_selection("5-3", 5).is_err());
/// ```
pub fn parse_selection(input: &str, len: usize) -> Result<Vec<usize>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    if input.eq_ignore_ascii_case(SELECT_ALL) {
        return Ok((0..len).collect());
    }

    let mut indices = BTreeSet::new();
    for token in input.split(',').map(str::trim) {
        let (start, end) = match token.split_once('-') {
            Some((a, b)) => (parse_index(a, token)?, parse_index(b, token)?),
            None => {
                let n = parse_index(token, token)?;
                (n, n)
            }
        };
        if start > end {
            return Err(ValidationError::ReversedRange { start, end });
        }
        for index in [start, end] {
            if index == 0 || index > len {
                return Err(ValidationError::OutOfRange { index, len });
            }
        }
        indices.extend((start - 1)..end);
    }

    Ok(indices.into_iter().collect())
}

fn parse_index(part: &str, token: &str) -> Result<usize, ValidationError> {
    part.trim()
        .parse::<usize>()
        .map_err(|_| ValidationError::InvalidToken(token.to_string()))
}

/// Parses the container prompt answer.
///
/// Empty input selects the default kind. Otherwise a 1-based number from
/// the listed kinds or a kind name is accepted.
pub fn parse_container_choice(input: &str) -> Result<ContainerKind, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(ContainerKind::default());
    }
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|idx| ContainerKind::iter().nth(idx))
            .ok_or_else(|| ValidationError::InvalidChoice(input.to_string()));
    }
    input
        .to_ascii_lowercase()
        .parse::<ContainerKind>()
        .map_err(|_| ValidationError::InvalidChoice(input.to_string()))
}
