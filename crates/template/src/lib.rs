//! Template Engine - placeholder templates for receipt HTML
//!
//! This crate provides:
//! - A parser for the `{{key}}` / `{{#block}}...{{/block}}` mini-language
//! - A node tree (`Template`) that can be parsed once and rendered many times
//! - Rendering against a `serde_json::Value` dictionary
//!
//! # Example
//!
//! ```
//! use template::Template;
//! use serde_json::json;
//!
//! let template = Template::parse("<p>{{cliente}}</p>{{#cuotas}}<i>{{numero}}</i>{{/cuotas}}").unwrap();
//! let html = template.render(&json!({
//!     "cliente": "Mario Rossi",
//!     "cuotas": [{ "numero": 1 }, { "numero": 2 }]
//! }));
//! assert_eq!(html, "<p>Mario Rossi</p><i>1</i><i>2</i>");
//! ```

pub mod parser;
mod renderer;
mod schema;

pub use parser::{parse_template, resolve_key, value_to_string};
pub use renderer::escape_html;
pub use schema::{Node, Template};

use thiserror::Error;

/// Errors that can occur during template processing
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),

    #[error("Empty tag at byte {0}")]
    EmptyTag(usize),

    #[error("Section '{key}' opened at byte {offset} is never closed")]
    UnclosedSection { key: String, offset: usize },

    #[error("Closing tag '{found}' at byte {offset} does not match open section '{expected}'")]
    MismatchedClose {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("Closing tag '{key}' at byte {offset} has no open section")]
    UnexpectedClose { key: String, offset: usize },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
