//! Output module: document rendering and run reporting
//!
//! This module handles:
//! - Composing the question document as markdown
//! - Converting it to HTML or plain text and writing it to disk
//! - Saving the discovered link list
//! - Printing the end-of-run report

mod convert;
mod document;
mod report;

pub use convert::{markdown_to_html, markdown_to_text, write_document, OutputFormat};
pub use document::{format_document, DocumentMeta};
pub use report::{print_run_report, save_links};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
