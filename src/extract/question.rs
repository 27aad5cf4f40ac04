//! Question-page extraction
//!
//! Field rules for one discussion page:
//! - Title from `h1` (required)
//! - Choices from `li.multi-choice-item`
//! - Suggested answer from `.correct-answer`
//! - Body text from `.card-text`, with site boilerplate lines removed and
//!   exhibit images appended as markdown image links
//! - Timestamp from `.discussion-meta-data > i`
//! - Comments from `.discussion-container`

use scraper::{Html, Selector};
use url::Url;

use crate::extract::{clean_text, ExtractError, QuestionRecord};

/// Parses one question page into a [`QuestionRecord`]
///
/// `link` is carried through into the record as the source link; `base` is
/// used to resolve relative exhibit image paths. A page without a title is
/// rejected rather than producing a partial record.
pub fn parse_question(html: &str, link: &str, base: &Url) -> Result<QuestionRecord, ExtractError> {
    let document = Html::parse_document(html);

    let title = select_text(&document, "h1");
    if title.is_empty() {
        return Err(ExtractError::MissingField {
            field: "title",
            link: link.to_string(),
        });
    }

    let choices: Vec<String> = select_all(&document, "li.multi-choice-item")
        .into_iter()
        .map(|text| clean_text(&text))
        .filter(|text| !text.is_empty())
        .collect();

    // The answer renders with embedded newlines and tabs; keep the full
    // string, just flattened.
    let answer = select_text_raw(&document, ".correct-answer")
        .replace(['\n', '\t'], "")
        .trim()
        .to_string();

    let content = extract_content(&document, base);

    let timestamp = select_text(&document, ".discussion-meta-data > i");
    let comments = select_text(&document, ".discussion-container");

    Ok(QuestionRecord {
        title,
        content,
        choices,
        answer,
        timestamp,
        link: link.to_string(),
        comments,
    })
}

/// Extracts the question body, dropping boilerplate lines and appending
/// exhibit images
fn extract_content(document: &Html, base: &Url) -> String {
    let text = clean_text(&select_text_raw(document, ".card-text"));

    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("Actual Exam")
            || (trimmed.starts_with("All") && trimmed.contains("Questions"))
        {
            continue;
        }
        lines.push(line);
    }
    let mut content = lines.join("\n");

    if let Ok(selector) = Selector::parse(".card-text img") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                let absolute = if src.starts_with("http") {
                    src.to_string()
                } else {
                    match base.join(src) {
                        Ok(url) => url.to_string(),
                        Err(_) => continue,
                    }
                };
                content.push_str(&format!("\n\n![Exhibit]({})", absolute));
            }
        }
    }

    content
}

/// Concatenated, cleaned text of the first element matching `selector`
fn select_text(document: &Html, selector: &str) -> String {
    clean_text(&select_text_raw(document, selector))
}

/// Concatenated raw text of the first element matching `selector`
fn select_text_raw(document: &Html, selector: &str) -> String {
    let parsed = match Selector::parse(selector) {
        Ok(s) => s,
        Err(_) => return String::new(),
    };

    document
        .select(&parsed)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}

/// Concatenated raw text of every element matching `selector`
fn select_all(document: &Html, selector: &str) -> Vec<String> {
    let parsed = match Selector::parse(selector) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&parsed)
        .map(|el| el.text().collect::<String>())
        .collect()
}
