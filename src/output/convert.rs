//! Output format conversion and file writing
//!
//! The document is always composed as markdown first; HTML and plain-text
//! outputs are conversions of that markdown, written with the matching file
//! extension.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pulldown_cmark::{html, Parser};
use regex::Regex;

use crate::output::{OutputError, OutputResult};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Html,
    Text,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
            OutputFormat::Text => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}

/// Converts markdown to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Converts markdown to plain text by stripping formatting
///
/// Headers and emphasis markers are removed, links keep their text, images
/// are dropped entirely.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = markdown.to_string();

    // Images before links: ![alt](url) would otherwise match the link rule
    let image = Regex::new(r"!\[.*?\]\(.*?\)").unwrap();
    text = image.replace_all(&text, "").to_string();

    let link = Regex::new(r"\[(.*?)\]\(.*?\)").unwrap();
    text = link.replace_all(&text, "$1").to_string();

    let header = Regex::new(r"(?m)^#{1,6}\s*").unwrap();
    text = header.replace_all(&text, "").to_string();

    let formatting = Regex::new(r"(\*\*|\*|__|_)").unwrap();
    text = formatting.replace_all(&text, "").to_string();

    text
}

/// Writes the composed markdown in the requested format
///
/// The target path keeps its stem and takes the format's extension. Returns
/// the path actually written.
pub fn write_document(
    markdown: &str,
    output_path: &Path,
    format: OutputFormat,
) -> OutputResult<PathBuf> {
    let content = match format {
        OutputFormat::Markdown => markdown.to_string(),
        OutputFormat::Html => markdown_to_html(markdown),
        OutputFormat::Text => markdown_to_text(markdown),
    };

    let path = output_path.with_extension(format.extension());
    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_markdown_to_html() {
        let html = markdown_to_html("# Title\n\nSome **bold** text");

        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_markdown_to_text_strips_headers() {
        let text = markdown_to_text("# Title\n\n## Section");
        assert_eq!(text.trim(), "Title\n\nSection");
    }

    #[test]
    fn test_markdown_to_text_strips_emphasis() {
        let text = markdown_to_text("**bold** and *italic*");
        assert_eq!(text, "bold and italic");
    }

    #[test]
    fn test_markdown_to_text_keeps_link_text() {
        let text = markdown_to_text("[View Discussion](https://example.com/x)");
        assert_eq!(text, "View Discussion");
    }

    #[test]
    fn test_markdown_to_text_drops_images() {
        let text = markdown_to_text("before\n![Exhibit](https://cdn.example.com/x.png)\nafter");
        assert_eq!(text, "before\n\nafter");
    }

    #[test]
    fn test_write_document_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exam.md");

        let written = write_document("# Exam", &target, OutputFormat::Markdown).unwrap();

        assert_eq!(written, target);
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "# Exam");
    }

    #[test]
    fn test_write_document_swaps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exam.md");

        let written = write_document("# Exam", &target, OutputFormat::Html).unwrap();

        assert_eq!(written, dir.path().join("exam.html"));
        assert!(std::fs::read_to_string(&written)
            .unwrap()
            .contains("<h1>Exam</h1>"));
    }
}
