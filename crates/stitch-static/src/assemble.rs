//! Page assembly.
//!
//! A page is its converted content wrapped in the shared fragments. Assembly
//! is a pure function of the content, the page key and the [`BuildContext`].

use chrono::Local;

use crate::config::SiteConfig;
use crate::fragments::Fragments;
use crate::substitute::{splice, ClassToken};

/// Class appended to the navigation link of the page being rendered.
pub const ACTIVE_CLASS: &str = "active-page";

/// Everything page assembly reads, fixed for one build run.
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    pub config: &'a SiteConfig,
    pub fragments: Fragments,
    /// Written into every page of the run
    pub built_at: String,
}

impl<'a> BuildContext<'a> {
    /// Create a context stamped with the current local time.
    pub fn new(config: &'a SiteConfig, fragments: Fragments) -> Self {
        let built_at = Local::now()
            .format("%a %b %d %Y %H:%M:%S GMT%z")
            .to_string();

        Self {
            config,
            fragments,
            built_at,
        }
    }

    pub fn with_timestamp(mut self, built_at: impl Into<String>) -> Self {
        self.built_at = built_at.into();
        self
    }
}

/// Navigation link identifier for a page key.
pub fn nav_identifier(key: &str) -> String {
    format!("menu-list-item-link-{key}")
}

/// Copy of the header with the page's navigation link marked active.
pub fn render_header(header: &str, key: &str) -> String {
    let identifier = nav_identifier(key);
    let marked = format!("{identifier} {ACTIVE_CLASS}");

    splice(header, &ClassToken(&identifier), &marked).into_owned()
}

/// Wrap page content in the main container, with or without the sidebar.
pub fn render_content(content: &str, sidebar: Option<&str>) -> String {
    match sidebar {
        None => format!(
            r#"<div class="main">
      <div class="content-no-sidebar">
        {content}
      </div>
    </div>"#
        ),
        Some(sidebar) => format!(
            r#"<div class="main">
    <div class="content-with-sidebar">
      {content}
    </div>{sidebar}
  </div>"#
        ),
    }
}

/// Build the complete, unformatted document for one page.
pub fn assemble_page(content: &str, key: &str, ctx: &BuildContext<'_>) -> String {
    let fragments = &ctx.fragments;

    let header = render_header(&fragments.header, key);
    let sidebar = ctx
        .config
        .has_sidebar(key)
        .then_some(fragments.sidebar.as_str());
    let main = render_content(content, sidebar);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
{head}
<body>
  {header}
  <div class="container">
    {main}
  </div>
  {footer}
  {script}
  <!-- Last updated: {built_at} -->
</body>
</html>
"#,
        lang = ctx.config.general.lang,
        head = fragments.head,
        footer = fragments.footer,
        script = fragments.script,
        built_at = ctx.built_at,
    )
}
