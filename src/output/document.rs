//! Markdown document composition
//!
//! Renders the final ordered record sequence into one markdown document:
//! a header block with exam metadata, then one numbered section per
//! question. Records are consumed as-is; ordering was already settled by
//! the pipeline.

use chrono::{DateTime, Utc};

use crate::extract::QuestionRecord;

/// Presentation metadata for a rendered document
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    /// Provider name, e.g. "google"
    pub provider: String,

    /// Exam code / search filter the document was built from
    pub exam_code: String,

    /// Whether to include the comment/discussion text per question
    pub include_comments: bool,

    /// When the document was generated
    pub generated_at: DateTime<Utc>,
}

/// Formats the record sequence as a markdown document
pub fn format_document(records: &[QuestionRecord], meta: &DocumentMeta) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Exam {}\n\n", meta.exam_code.to_uppercase()));
    md.push_str(&format!(
        "**Provider:** {}\n\n",
        capitalize(&meta.provider)
    ));
    md.push_str(&format!(
        "**Exam Code:** {}\n\n",
        meta.exam_code.to_uppercase()
    ));
    md.push_str(&format!("**Total Questions:** {}\n\n", records.len()));
    md.push_str(&format!(
        "**Generated:** {}\n\n",
        meta.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str("---\n\n");

    let mut number = 1;
    for record in records {
        if record.title.is_empty() {
            continue;
        }

        md.push_str(&format!("## Question {}\n\n", number));
        number += 1;

        if !record.content.is_empty() {
            md.push_str(&format!("{}\n\n", record.content));
        }

        for choice in &record.choices {
            md.push_str(&format!("{}\n\n", choice));
        }

        md.push_str(&format!("**Suggested Answer: {}**\n\n", record.answer));
        md.push_str(&format!("**Added Since: {}**\n\n", record.timestamp));
        md.push_str(&format!("[View Discussion]({})\n\n", record.link));

        if meta.include_comments {
            md.push_str(&format!("Comments: {}\n", record.comments));
        }

        md.push_str("----------------------------------------\n\n");
    }

    md
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
