//! Title/date extraction from free task text.
//!
//! Extraction is an untrusted, fallible oracle: an implementation may call
//! out to an AI model or apply local heuristics, and the caller must run
//! the same validation over its output as over user-typed input (empty
//! title, missing date). A `None` due date means "no date found" and is a
//! hard failure upstream, never a default.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;

static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}/\d{1,2}").expect("date token pattern is valid"));

/// Candidate fields extracted from free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Proposed task title. May be empty; the caller validates.
    pub title: String,
    /// Raw `M/D` token, or `None` when the text names no date.
    pub due_date: Option<String>,
}

/// Extracts a task title and an abbreviated due date from free text.
#[async_trait]
pub trait TaskExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Extraction>;
}

/// Deterministic extractor: the last `M/D` token in the text becomes the
/// due date and the remaining text the title.
///
/// Stands in for the external model-backed extractor; its output goes
/// through the same downstream validation, so a nonsensical match (say,
/// month 24 inside a longer number) is rejected there rather than here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

#[async_trait]
impl TaskExtractor for PatternExtractor {
    async fn extract(&self, text: &str) -> Result<Extraction> {
        let trimmed = text.trim();
        let Some(found) = DATE_TOKEN_RE.find_iter(trimmed).last() else {
            return Ok(Extraction {
                title: trimmed.to_string(),
                due_date: None,
            });
        };

        let remainder = format!("{} {}", &trimmed[..found.start()], &trimmed[found.end()..]);
        let title = remainder.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(Extraction {
            title,
            due_date: Some(found.as_str().to_string()),
        })
    }
}
