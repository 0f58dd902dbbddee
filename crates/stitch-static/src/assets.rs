//! Stylesheet compilation and static asset copying.

use std::path::Path;

use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions};
use tokio::fs;
use walkdir::WalkDir;

use crate::collaborators::StylesheetCompiler;

/// Stylesheet compiler backed by lightningcss.
///
/// `@import` rules are inlined by the bundler, so a single entry point can
/// pull in the whole stylesheet tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightningCss {
    pub minify: bool,
}

impl LightningCss {
    pub fn new(minify: bool) -> Self {
        Self { minify }
    }
}

impl StylesheetCompiler for LightningCss {
    fn compile(&self, entry: &Path) -> Result<String, String> {
        let provider = FileProvider::new();
        let mut bundler = Bundler::new(&provider, None, ParserOptions::default());

        let stylesheet = bundler
            .bundle(entry)
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let css = stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                ..Default::default()
            })
            .map_err(|e| format!("CSS print error: {}", e))?;

        Ok(css.code)
    }
}

/// Recursively copy `src` into `dst`, creating directories and overwriting
/// existing files. Returns the number of files copied.
pub async fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).await?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::copy(entry.path(), &target).await?;
            tracing::debug!("Copied {}", relative.display());
            copied += 1;
        }
    }

    Ok(copied)
}
