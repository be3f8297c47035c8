//! Shareholder name search

use super::records::Shareholder;
use thiserror::Error;

/// Shortest query the backend is asked about
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please enter at least 2 characters to search")]
    TooShort,
}

/// Trim the raw input and reject queries that are too short
pub fn prepare_query(raw: &str) -> Result<String, SearchError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return Err(SearchError::TooShort);
    }
    Ok(trimmed.to_string())
}

/// Where a completed search leads
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NotFound,
    /// Exactly one match: open the wizard directly
    Single(String),
    /// Several matches: let the user pick
    Multiple {
        results: Vec<Shareholder>,
        query: String,
    },
}

impl SearchOutcome {
    pub fn classify(mut results: Vec<Shareholder>, query: String) -> Self {
        match results.len() {
            0 => Self::NotFound,
            1 => Self::Single(results.remove(0).id),
            _ => Self::Multiple { results, query },
        }
    }
}
