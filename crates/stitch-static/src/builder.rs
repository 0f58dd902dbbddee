//! Static site builder.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::fs;

use crate::assemble::{assemble_page, BuildContext};
use crate::assets::{copy_dir, LightningCss};
use crate::collaborators::{
    CommonMark, HtmlFormatter, MarkdownConverter, Passthrough, StylesheetCompiler,
};
use crate::config::{SiteConfig, SourceLayout};
use crate::format::Indenter;
use crate::fragments::{load_fragments, Part};
use crate::scan::{extension_of, key_of, scan, ExtensionFilter, ScanError};

/// Extensions picked up from the pages directory.
pub const PAGE_EXTENSIONS: [&str; 3] = ["html", "md", "txt"];

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written
    pub pages: usize,

    /// Number of script files bundled
    pub scripts: usize,

    /// Number of asset files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Pipeline stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pages,
    Fragments,
    Scripts,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pages => "pages",
            Stage::Fragments => "fragments",
            Stage::Scripts => "scripts",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to scan {stage}: {source}")]
    Scan { stage: Stage, source: ScanError },

    #[error("Failed to read {} ({stage}): {source}", path.display())]
    Read {
        stage: Stage,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid placeholder symbol in {part} replacements: {message}")]
    Pattern { part: Part, message: String },

    #[error("Failed to compile stylesheet {}: {message}", path.display())]
    Stylesheet { path: PathBuf, message: String },

    #[error("Failed to copy assets from {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// How a page's raw content becomes HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Html,
    Markdown,
    /// Passed through unescaped, like HTML
    Text,
}

impl PageKind {
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some("md") => PageKind::Markdown,
            Some("txt") => PageKind::Text,
            _ => PageKind::Html,
        }
    }
}

/// A discovered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    /// Source file path
    pub path: PathBuf,

    /// File name before the first `.`
    pub key: String,

    pub kind: PageKind,

    /// Output path, always `<key>.html`
    pub output_path: PathBuf,
}

impl PageSource {
    /// Describe the page at `path`.
    ///
    /// Pages from nested directories are written flat into `output_dir`.
    pub fn new(path: &Path, output_dir: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = key_of(&file_name).to_string();
        let kind = PageKind::from_extension(extension_of(&file_name));
        let output_path = output_dir.join(format!("{key}.html"));

        Self {
            path: path.to_path_buf(),
            key,
            kind,
            output_path,
        }
    }
}

/// Static site builder.
pub struct StaticBuilder {
    config: SiteConfig,
    stylesheets: Box<dyn StylesheetCompiler>,
    markdown: Box<dyn MarkdownConverter>,
    formatter: Box<dyn HtmlFormatter>,
}

impl StaticBuilder {
    /// Create a new static builder with the default collaborators.
    pub fn new(config: SiteConfig) -> Self {
        let formatter: Box<dyn HtmlFormatter> = if config.build.pretty {
            Box::new(Indenter::default())
        } else {
            Box::new(Passthrough)
        };

        Self {
            stylesheets: Box::new(LightningCss::new(config.build.minify)),
            markdown: Box::new(CommonMark),
            formatter,
            config,
        }
    }

    pub fn with_stylesheet_compiler(mut self, compiler: impl StylesheetCompiler + 'static) -> Self {
        self.stylesheets = Box::new(compiler);
        self
    }

    pub fn with_markdown_converter(mut self, converter: impl MarkdownConverter + 'static) -> Self {
        self.markdown = Box::new(converter);
        self
    }

    pub fn with_formatter(mut self, formatter: impl HtmlFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Build the static site.
    ///
    /// Stops at the first error; files written before it stay on disk.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let layout = self.config.layout();

        fs::create_dir_all(&layout.output)
            .await
            .map_err(|source| BuildError::Write {
                path: layout.output.clone(),
                source,
            })?;

        let pages = self.discover_pages(&layout).await?;

        let fragments = load_fragments(&self.config, &layout).await?;
        let ctx = BuildContext::new(&self.config, fragments);

        tracing::info!("Processing html files");
        for page in &pages {
            self.build_page(page, &ctx).await?;
        }

        tracing::info!("Processing css files");
        self.build_stylesheet(&layout).await?;

        tracing::info!("Processing js files");
        let scripts = self.bundle_scripts(&layout).await?;

        tracing::info!("Processing assets");
        let assets = self.copy_assets(&layout).await?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            scripts,
            assets,
            duration_ms: duration.as_millis() as u64,
            output_dir: layout.output,
        })
    }

    /// Find every page source, in scan order.
    async fn discover_pages(&self, layout: &SourceLayout) -> Result<Vec<PageSource>, BuildError> {
        let pages_dir = layout.pages_dir();

        let paths = scan(&pages_dir, &ExtensionFilter::one_of(PAGE_EXTENSIONS))
            .await
            .map_err(|source| BuildError::Scan {
                stage: Stage::Pages,
                source,
            })?;

        Ok(paths
            .iter()
            .map(|path| PageSource::new(path, &layout.output))
            .collect())
    }

    /// Convert, assemble, format and write a single page.
    async fn build_page(&self, page: &PageSource, ctx: &BuildContext<'_>) -> Result<(), BuildError> {
        tracing::info!("Processing file: {}", page.path.display());

        let raw = fs::read_to_string(&page.path)
            .await
            .map_err(|source| BuildError::Read {
                stage: Stage::Pages,
                path: page.path.clone(),
                source,
            })?;

        let content = match page.kind {
            PageKind::Markdown => Cow::Owned(self.markdown.to_html(&raw)),
            PageKind::Html | PageKind::Text => Cow::Borrowed(raw.as_str()),
        };

        let document = assemble_page(&content, &page.key, ctx);
        let html = self.formatter.format(&document);

        write_output(&page.output_path, html).await
    }

    /// Compile the stylesheet entry point to `style.css`.
    async fn build_stylesheet(&self, layout: &SourceLayout) -> Result<(), BuildError> {
        let css = self
            .stylesheets
            .compile(&layout.stylesheet)
            .map_err(|message| BuildError::Stylesheet {
                path: layout.stylesheet.clone(),
                message,
            })?;

        write_output(&layout.output_stylesheet(), css).await
    }

    /// Concatenate every script file into `bundle.js`.
    async fn bundle_scripts(&self, layout: &SourceLayout) -> Result<usize, BuildError> {
        let files = scan(&layout.scripts_dir(), &ExtensionFilter::single("js"))
            .await
            .map_err(|source| BuildError::Scan {
                stage: Stage::Scripts,
                source,
            })?;

        let mut bundle = String::new();
        for file in &files {
            tracing::info!("Concatenating file: {}", file.display());

            let content = fs::read_to_string(file)
                .await
                .map_err(|source| BuildError::Read {
                    stage: Stage::Scripts,
                    path: file.clone(),
                    source,
                })?;

            bundle.push_str(&format!("// {}\n\n{}\n\n", file.display(), content));
        }

        write_output(&layout.output_bundle(), bundle).await?;

        Ok(files.len())
    }

    /// Copy the assets tree into the output.
    async fn copy_assets(&self, layout: &SourceLayout) -> Result<usize, BuildError> {
        let assets_dir = layout.assets_dir();

        let exists = fs::try_exists(&assets_dir)
            .await
            .map_err(|source| BuildError::Copy {
                path: assets_dir.clone(),
                source,
            })?;
        if !exists {
            tracing::warn!("Assets directory not found: {}", assets_dir.display());
            return Ok(0);
        }

        copy_dir(&assets_dir, &layout.output_assets())
            .await
            .map_err(|source| BuildError::Copy {
                path: layout.assets_dir(),
                source,
            })
    }
}

/// Write a file, creating its parent directories.
async fn write_output(path: &Path, contents: String) -> Result<(), BuildError> {
    let write_error = |source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    fs::write(path, contents).await.map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::{tempdir, TempDir};

    const HEADER: &str = r#"<header>
<nav>
<a class="menu-list-item-link-index" href="index.html">Home</a>
<a class="menu-list-item-link-about" href="about.html">About</a>
<a class="menu-list-item-link-notes" href="notes.html">Notes</a>
</nav>
</header>"#;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std_fs::create_dir_all(parent).unwrap();
        }
        std_fs::write(path, contents).unwrap();
    }

    /// Lay out a complete source tree and return its config.
    fn site(temp: &TempDir) -> SiteConfig {
        let src = temp.path().join("src");

        write(&src.join("parts/head/head.html"), "<head>\n<title>{{ title }}</title>\n</head>");
        write(&src.join("parts/header/header.html"), HEADER);
        write(&src.join("parts/sidebar/sidebar.html"), "<aside class=\"sidebar\">Links</aside>");
        write(&src.join("parts/footer/footer.html"), "<footer>{{ copyright }}</footer>");
        write(
            &src.join("parts/script/script.html"),
            "<script src=\"bundle.js\"></script>",
        );
        write(&src.join("parts/script/menu.js"), "console.log('menu');");
        write(&src.join("parts/script/lib/util.js"), "function util() {}");
        write(&src.join("parts/script/notes.txt"), "not bundled");

        write(&src.join("pages/index.html"), "<h1>Welcome</h1>");
        write(&src.join("pages/about.txt"), "<p>About <b>us</b></p>");
        write(&src.join("pages/notes.md"), "# Notes\n\nSome *notes*.");
        write(&src.join("pages/blog/post.html"), "<article>Post</article>");
        write(&src.join("pages/draft.css"), "ignored");

        write(&src.join("style/style.css"), ".page {\n  color: black;\n}\n");
        write(&src.join("assets/images/logo.svg"), "<svg/>");

        let text = format!(
            r#"
[general]
lang = "en"

[build]
source = {:?}
output = {:?}

[pages.about]
sidebar = false

[[head.replacements]]
symbol = "title"
value = "Test Site"

[[footer.replacements]]
symbol = "copyright"
value = "(c) Test"
"#,
            src.display().to_string(),
            temp.path().join("dest").display().to_string(),
        );
        toml::from_str(&text).unwrap()
    }

    fn read(path: PathBuf) -> String {
        std_fs::read_to_string(path).unwrap()
    }

    #[tokio::test]
    async fn builds_complete_site() {
        let temp = tempdir().unwrap();
        let config = site(&temp);
        let out = temp.path().join("dest");

        let result = StaticBuilder::new(config).build().await.unwrap();

        assert_eq!(result.pages, 4);
        assert_eq!(result.scripts, 2);
        assert_eq!(result.assets, 1);
        assert_eq!(result.output_dir, out);

        assert!(out.join("index.html").exists());
        assert!(out.join("about.html").exists());
        assert!(out.join("notes.html").exists());
        assert!(read(out.join("post.html")).contains("<article>Post</article>"));
        assert!(!out.join("blog").exists());
        assert!(!out.join("draft.html").exists());
        assert!(out.join("style.css").exists());
        assert!(out.join("bundle.js").exists());
        assert_eq!(read(out.join("assets/images/logo.svg")), "<svg/>");
    }

    #[tokio::test]
    async fn converts_markdown_pages() {
        let temp = tempdir().unwrap();
        let config = site(&temp);

        StaticBuilder::new(config).build().await.unwrap();

        let notes = read(temp.path().join("dest/notes.html"));
        assert!(notes.contains("<h1>Notes</h1>"));
        assert!(notes.contains("<em>notes</em>"));
        assert!(!notes.contains("# Notes"));
        assert!(notes.contains("menu-list-item-link-notes active-page"));
    }

    #[tokio::test]
    async fn passes_text_pages_through() {
        let temp = tempdir().unwrap();
        let config = site(&temp);

        StaticBuilder::new(config).build().await.unwrap();

        let about = read(temp.path().join("dest/about.html"));
        assert!(about.contains("<p>About <b>us</b></p>"));
        assert!(about.contains("content-no-sidebar"));
        assert!(!about.contains("Links"));
        assert!(about.contains("menu-list-item-link-about active-page"));
        assert!(!about.contains("menu-list-item-link-index active-page"));
    }

    #[tokio::test]
    async fn applies_fragments_to_every_page() {
        let temp = tempdir().unwrap();
        let config = site(&temp);

        StaticBuilder::new(config).build().await.unwrap();

        let index = read(temp.path().join("dest/index.html"));
        assert!(index.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(index.contains("<title>Test Site</title>"));
        assert!(index.contains("<footer>(c) Test</footer>"));
        assert!(index.contains("content-with-sidebar"));
        assert!(index.contains("<aside class=\"sidebar\">Links</aside>"));
        assert!(index.contains("<!-- Last updated: "));
    }

    #[tokio::test]
    async fn formats_output_unless_disabled() {
        let temp = tempdir().unwrap();
        let config = site(&temp);

        StaticBuilder::new(config.clone()).build().await.unwrap();
        let pretty = read(temp.path().join("dest/index.html"));
        assert!(pretty.contains("\n  <head>\n    <title>Test Site</title>\n  </head>\n"));

        StaticBuilder::new(config)
            .with_formatter(Passthrough)
            .build()
            .await
            .unwrap();
        let raw = read(temp.path().join("dest/index.html"));
        assert!(raw.contains("\n<head>\n<title>Test Site</title>\n</head>\n"));
    }

    #[tokio::test]
    async fn bundles_scripts_with_source_comments() {
        let temp = tempdir().unwrap();
        let config = site(&temp);
        let scripts = temp.path().join("src/parts/script");

        StaticBuilder::new(config).build().await.unwrap();

        let bundle = read(temp.path().join("dest/bundle.js"));
        let menu = format!("// {}\n\nconsole.log('menu');\n\n", scripts.join("menu.js").display());
        let util = format!(
            "// {}\n\nfunction util() {{}}\n\n",
            scripts.join("lib/util.js").display()
        );
        assert!(bundle.contains(&menu));
        assert!(bundle.contains(&util));
        assert!(!bundle.contains("not bundled"));
        assert_eq!(bundle.len(), menu.len() + util.len());
    }

    #[tokio::test]
    async fn compiles_stylesheet() {
        let temp = tempdir().unwrap();
        let config = site(&temp);

        StaticBuilder::new(config).build().await.unwrap();

        let css = read(temp.path().join("dest/style.css"));
        assert!(css.contains(".page"));
        assert!(css.contains("color"));
    }

    #[tokio::test]
    async fn missing_fragment_writes_no_pages() {
        let temp = tempdir().unwrap();
        let config = site(&temp);
        std_fs::remove_file(temp.path().join("src/parts/footer/footer.html")).unwrap();

        let result = StaticBuilder::new(config).build().await;

        assert!(matches!(
            result,
            Err(BuildError::Read {
                stage: Stage::Fragments,
                ..
            })
        ));
        assert!(!temp.path().join("dest/index.html").exists());
    }

    #[tokio::test]
    async fn missing_pages_directory_fails() {
        let temp = tempdir().unwrap();
        let config = site(&temp);
        std_fs::remove_dir_all(temp.path().join("src/pages")).unwrap();

        let result = StaticBuilder::new(config).build().await;

        assert!(matches!(
            result,
            Err(BuildError::Scan {
                stage: Stage::Pages,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn stylesheet_failure_keeps_written_pages() {
        let temp = tempdir().unwrap();
        let config = site(&temp);
        std_fs::remove_file(temp.path().join("src/style/style.css")).unwrap();

        let result = StaticBuilder::new(config).build().await;

        assert!(matches!(result, Err(BuildError::Stylesheet { .. })));
        assert!(temp.path().join("dest/index.html").exists());
        assert!(!temp.path().join("dest/bundle.js").exists());
    }

    #[tokio::test]
    async fn missing_assets_directory_is_skipped() {
        let temp = tempdir().unwrap();
        let config = site(&temp);
        std_fs::remove_dir_all(temp.path().join("src/assets")).unwrap();

        let result = StaticBuilder::new(config).build().await.unwrap();

        assert_eq!(result.assets, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_assets_directory_fails() {
        let temp = tempdir().unwrap();
        let config = site(&temp);
        let assets = temp.path().join("src/assets");
        std_fs::remove_dir_all(&assets).unwrap();
        // A self-referencing link cannot be resolved (ELOOP).
        std::os::unix::fs::symlink(&assets, &assets).unwrap();

        let result = StaticBuilder::new(config).build().await;

        assert!(matches!(result, Err(BuildError::Copy { path, .. }) if path == assets));
        assert!(temp.path().join("dest/index.html").exists());
    }

    #[tokio::test]
    async fn uses_injected_stylesheet_compiler() {
        struct Fixed;

        impl StylesheetCompiler for Fixed {
            fn compile(&self, _entry: &Path) -> Result<String, String> {
                Ok(".fixed{}".to_string())
            }
        }

        let temp = tempdir().unwrap();
        let config = site(&temp);

        StaticBuilder::new(config)
            .with_stylesheet_compiler(Fixed)
            .build()
            .await
            .unwrap();

        assert_eq!(read(temp.path().join("dest/style.css")), ".fixed{}");
    }

    #[tokio::test]
    async fn injected_stylesheet_error_is_reported() {
        struct Broken;

        impl StylesheetCompiler for Broken {
            fn compile(&self, _entry: &Path) -> Result<String, String> {
                Err("unexpected token".to_string())
            }
        }

        let temp = tempdir().unwrap();
        let config = site(&temp);
        let entry = temp.path().join("src/style/style.css");

        let result = StaticBuilder::new(config)
            .with_stylesheet_compiler(Broken)
            .build()
            .await;

        match result {
            Err(BuildError::Stylesheet { path, message }) => {
                assert_eq!(path, entry);
                assert_eq!(message, "unexpected token");
            }
            other => panic!("expected stylesheet error, got {other:?}"),
        }
        assert!(temp.path().join("dest/index.html").exists());
        assert!(!temp.path().join("dest/style.css").exists());
    }

    #[tokio::test]
    async fn uses_injected_markdown_converter() {
        struct Shouting;

        impl MarkdownConverter for Shouting {
            fn to_html(&self, markdown: &str) -> String {
                format!("<p>{}</p>", markdown.to_uppercase())
            }
        }

        let temp = tempdir().unwrap();
        let config = site(&temp);

        StaticBuilder::new(config)
            .with_markdown_converter(Shouting)
            .build()
            .await
            .unwrap();

        let notes = read(temp.path().join("dest/notes.html"));
        assert!(notes.contains("# NOTES"));
    }

    #[test]
    fn page_source_normalizes_extension() {
        let page = PageSource::new(
            Path::new("src/pages/notes.md"),
            Path::new("dest"),
        );

        assert_eq!(page.key, "notes");
        assert_eq!(page.kind, PageKind::Markdown);
        assert_eq!(page.output_path, PathBuf::from("dest/notes.html"));
    }

    #[test]
    fn page_source_flattens_subdirectory() {
        let page = PageSource::new(Path::new("src/pages/guides/intro.txt"), Path::new("dest"));

        assert_eq!(page.key, "intro");
        assert_eq!(page.kind, PageKind::Text);
        assert_eq!(page.output_path, PathBuf::from("dest/intro.html"));
    }
}
