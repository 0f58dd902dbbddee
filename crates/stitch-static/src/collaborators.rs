//! Interfaces to the external transformations the builder relies on.

use std::path::Path;

/// Compiles a stylesheet entry point to CSS text.
pub trait StylesheetCompiler: Send + Sync {
    /// Compile the stylesheet at `entry`, resolving its imports.
    fn compile(&self, entry: &Path) -> Result<String, String>;
}

/// Converts Markdown page sources to HTML.
pub trait MarkdownConverter: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

/// Reformats a finished HTML document for readability.
pub trait HtmlFormatter: Send + Sync {
    /// Must not change the document's meaning, only its whitespace.
    fn format(&self, html: &str) -> String;
}

/// CommonMark conversion with the usual extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMark;

impl MarkdownConverter for CommonMark {
    fn to_html(&self, markdown: &str) -> String {
        stitch_markdown::to_html(markdown)
    }
}

/// Leaves HTML exactly as assembled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl HtmlFormatter for Passthrough {
    fn format(&self, html: &str) -> String {
        html.to_string()
    }
}
