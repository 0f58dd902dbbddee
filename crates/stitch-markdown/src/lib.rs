//! Markdown to HTML conversion for stitch pages.
//!
//! Pages written in Markdown are converted to an HTML fragment before they are
//! wrapped in the site layout. The conversion never fails: any input is valid
//! CommonMark.

pub mod render;

pub use render::{options, to_html};
