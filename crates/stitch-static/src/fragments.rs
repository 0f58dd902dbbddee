//! Shared layout fragments.

use std::fmt;

use tokio::fs;

use crate::builder::{BuildError, Stage};
use crate::config::{Replacement, SiteConfig, SourceLayout};
use crate::substitute::{placeholder, replace_pattern};

/// The named layout parts every page is wrapped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Head,
    Header,
    Sidebar,
    Footer,
    Script,
}

impl Part {
    pub const ALL: [Part; 5] = [
        Part::Head,
        Part::Header,
        Part::Sidebar,
        Part::Footer,
        Part::Script,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Part::Head => "head",
            Part::Header => "header",
            Part::Sidebar => "sidebar",
            Part::Footer => "footer",
            Part::Script => "script",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loaded and substituted fragments for one build run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub head: String,
    pub header: String,
    pub sidebar: String,
    pub footer: String,
    pub script: String,
}

impl Fragments {
    fn slot(&mut self, part: Part) -> &mut String {
        match part {
            Part::Head => &mut self.head,
            Part::Header => &mut self.header,
            Part::Sidebar => &mut self.sidebar,
            Part::Footer => &mut self.footer,
            Part::Script => &mut self.script,
        }
    }
}

/// Apply replacement directives in order, each over the previous result.
pub fn apply_replacements(
    source: &str,
    replacements: &[Replacement],
) -> Result<String, regex::Error> {
    let mut rendered = source.to_string();

    for replacement in replacements {
        let pattern = placeholder(&replacement.symbol)?;
        rendered = replace_pattern(&rendered, &pattern, &replacement.value).into_owned();
    }

    Ok(rendered)
}

/// Read every fragment and apply its configured replacements.
///
/// The script fragment is taken verbatim. A missing fragment fails the build.
pub async fn load_fragments(
    config: &SiteConfig,
    layout: &SourceLayout,
) -> Result<Fragments, BuildError> {
    let mut fragments = Fragments::default();

    for part in Part::ALL {
        let path = layout.part_file(part);
        let source = fs::read_to_string(&path)
            .await
            .map_err(|source| BuildError::Read {
                stage: Stage::Fragments,
                path: path.clone(),
                source,
            })?;

        let rendered = match config.replacements(part) {
            Some(replacements) => {
                tracing::debug!(
                    "Applying {} replacements to {}",
                    replacements.len(),
                    part
                );
                apply_replacements(&source, replacements).map_err(|e| {
                    BuildError::Pattern {
                        part,
                        message: e.to_string(),
                    }
                })?
            }
            None => source,
        };

        *fragments.slot(part) = rendered;
    }

    Ok(fragments)
}
