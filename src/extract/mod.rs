//! HTML extraction rules for the discussion site
//!
//! This module turns fetched documents into structured data:
//! - Listing pages: total page count and candidate question links
//! - Question pages: a fully-populated [`QuestionRecord`] or a parse error
//!
//! Extraction is all-or-nothing. A page missing its required fields yields an
//! error, never a partially-populated record.

mod listing;
mod question;

pub use listing::{exam_links, page_count, question_links};
pub use question::parse_question;

use thiserror::Error;

/// Errors produced while extracting structured data from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing {field} in page at {link}")]
    MissingField { field: &'static str, link: String },
}

/// The extracted unit of content: one exam question with its discussion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// Question title
    pub title: String,

    /// Question body text, with exhibit images appended as markdown links
    pub content: String,

    /// Multiple-choice options
    pub choices: Vec<String>,

    /// Suggested answer
    pub answer: String,

    /// When the question was added to the site
    pub timestamp: String,

    /// Link to the source discussion page
    pub link: String,

    /// Full comment/discussion text
    pub comments: String,
}

/// Collapses whitespace line by line and drops blank lines
pub(crate) fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
