//! Site configuration.
//!
//! Loaded once at startup from `stitch.toml` (or a `.json` file with the same
//! shape) and read-only for the rest of the build.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fragments::Part;

/// Top-level configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// General document settings
    pub general: General,

    /// Per-page settings keyed by page key
    #[serde(default)]
    pub pages: HashMap<String, PageSettings>,

    #[serde(default)]
    pub head: FragmentSettings,

    #[serde(default)]
    pub header: FragmentSettings,

    #[serde(default)]
    pub sidebar: FragmentSettings,

    #[serde(default)]
    pub footer: FragmentSettings,

    /// Source and output locations
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    /// Document language code, written to `<html lang="...">`
    pub lang: String,
}

/// Settings for a single page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSettings {
    /// `Some(false)` hides the sidebar; unset or `true` shows it
    #[serde(default)]
    pub sidebar: Option<bool>,
}

/// Replacement directives for one layout fragment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FragmentSettings {
    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

/// A single `{{ symbol }}` replacement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Replacement {
    pub symbol: String,
    pub value: String,
}

/// Build locations and output options.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Stylesheet entry point, relative to `source`
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,

    #[serde(default)]
    pub minify: bool,

    /// Re-indent generated HTML
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_source() -> PathBuf {
    PathBuf::from("src")
}
fn default_output() -> PathBuf {
    PathBuf::from("dest")
}
fn default_stylesheet() -> PathBuf {
    PathBuf::from("style/style.css")
}
fn default_pretty() -> bool {
    true
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            stylesheet: default_stylesheet(),
            minify: false,
            pretty: default_pretty(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl SiteConfig {
    /// Load configuration from a file. `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Whether the page with this key gets the sidebar.
    ///
    /// Only an explicit `sidebar = false` disables it.
    pub fn has_sidebar(&self, key: &str) -> bool {
        !matches!(self.pages.get(key).and_then(|p| p.sidebar), Some(false))
    }

    /// Replacement directives for a fragment. The script fragment has none.
    pub fn replacements(&self, part: Part) -> Option<&[Replacement]> {
        let settings = match part {
            Part::Head => &self.head,
            Part::Header => &self.header,
            Part::Sidebar => &self.sidebar,
            Part::Footer => &self.footer,
            Part::Script => return None,
        };
        Some(&settings.replacements)
    }

    /// Resolved source and output paths.
    pub fn layout(&self) -> SourceLayout {
        SourceLayout {
            source: self.build.source.clone(),
            output: self.build.output.clone(),
            stylesheet: self.build.source.join(&self.build.stylesheet),
        }
    }
}

/// Fixed locations inside the source and output trees.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    pub source: PathBuf,
    pub output: PathBuf,
    pub stylesheet: PathBuf,
}

impl SourceLayout {
    pub fn pages_dir(&self) -> PathBuf {
        self.source.join("pages")
    }

    /// `<source>/parts/<name>/<name>.html`
    pub fn part_file(&self, part: Part) -> PathBuf {
        self.source
            .join("parts")
            .join(part.name())
            .join(format!("{}.html", part.name()))
    }

    /// Directory scanned for `.js` files to bundle.
    pub fn scripts_dir(&self) -> PathBuf {
        self.source.join("parts").join(Part::Script.name())
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.source.join("assets")
    }

    pub fn output_stylesheet(&self) -> PathBuf {
        self.output.join("style.css")
    }

    pub fn output_bundle(&self) -> PathBuf {
        self.output.join("bundle.js")
    }

    pub fn output_assets(&self) -> PathBuf {
        self.output.join("assets")
    }
}
