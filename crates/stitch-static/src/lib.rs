//! Static site builder for stitch.
//!
//! Wraps page sources in shared layout fragments, substitutes `{{ ... }}`
//! placeholders, and writes a deployable site: one HTML file per page, a
//! compiled stylesheet, a script bundle and the copied assets.

pub mod assemble;
pub mod assets;
pub mod builder;
pub mod collaborators;
pub mod config;
pub mod format;
pub mod fragments;
pub mod scan;
pub mod substitute;

pub use assemble::{assemble_page, BuildContext};
pub use builder::{BuildError, BuildResult, PageKind, PageSource, Stage, StaticBuilder};
pub use collaborators::{HtmlFormatter, MarkdownConverter, StylesheetCompiler};
pub use config::{ConfigError, SiteConfig, SourceLayout};
pub use fragments::{load_fragments, Fragments, Part};
pub use scan::{scan, ExtensionFilter, ScanError};
pub use substitute::{placeholder, replace_literal, replace_pattern};
