//! Scaffold a new site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command in the current directory.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing stitch...");

    scaffold(Path::new("."), config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'stitch build' to build the site.");

    Ok(())
}

/// Write the config file and a minimal source tree under `root`.
///
/// Existing files are kept unless `yes` is set.
fn scaffold(root: &Path, config_path: &Path, yes: bool) -> Result<()> {
    let src = root.join("src");

    if src.exists() && !yes {
        tracing::warn!("src/ directory already exists. Use --yes to overwrite.");
        return Ok(());
    }

    let is_json = config_path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let config = if is_json {
        DEFAULT_CONFIG_JSON
    } else {
        DEFAULT_CONFIG
    };
    write_file(&root.join(config_path), config, yes)?;

    let files: [(&str, &str); 10] = [
        ("pages/index.html", DEFAULT_INDEX),
        ("pages/about.md", DEFAULT_ABOUT),
        ("parts/head/head.html", DEFAULT_HEAD),
        ("parts/header/header.html", DEFAULT_HEADER),
        ("parts/sidebar/sidebar.html", DEFAULT_SIDEBAR),
        ("parts/footer/footer.html", DEFAULT_FOOTER),
        ("parts/script/script.html", DEFAULT_SCRIPT),
        ("parts/script/main.js", DEFAULT_JS),
        ("style/style.css", DEFAULT_CSS),
        ("assets/robots.txt", DEFAULT_ROBOTS),
    ];

    for (relative, content) in files {
        write_file(&src.join(relative), content, yes)?;
    }

    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# stitch configuration

[general]
# Document language, written to <html lang="...">
lang = "en"

[build]
source = "src"
output = "dest"
stylesheet = "style/style.css"
minify = false
pretty = true

# Per-page settings, keyed by file name without extension
[pages.about]
sidebar = false

# Placeholder replacements, applied in order to each fragment.
# A placeholder match starts at the first "{{" in the fragment, so list
# directives in the order their placeholders appear.
[[head.replacements]]
symbol = "title"
value = "My Site"

[[head.replacements]]
symbol = "description"
value = "Built with stitch"

[[header.replacements]]
symbol = "brand"
value = "My Site"

[[footer.replacements]]
symbol = "copyright"
value = "All rights reserved"
"#;

const DEFAULT_CONFIG_JSON: &str = r#"{
  "general": { "lang": "en" },
  "build": { "source": "src", "output": "dest" },
  "pages": { "about": { "sidebar": false } },
  "head": {
    "replacements": [
      { "symbol": "title", "value": "My Site" },
      { "symbol": "description", "value": "Built with stitch" }
    ]
  },
  "header": { "replacements": [{ "symbol": "brand", "value": "My Site" }] },
  "footer": { "replacements": [{ "symbol": "copyright", "value": "All rights reserved" }] }
}
"#;

const DEFAULT_HEAD: &str = r#"<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <meta name="description" content="{{ description }}">
  <link rel="stylesheet" href="style.css">
</head>"#;

const DEFAULT_HEADER: &str = r#"<header class="header">
  <a class="brand" href="index.html">{{ brand }}</a>
  <ul class="menu-list">
    <li class="menu-list-item"><a class="menu-list-item-link menu-list-item-link-index" href="index.html">Home</a></li>
    <li class="menu-list-item"><a class="menu-list-item-link menu-list-item-link-about" href="about.html">About</a></li>
  </ul>
</header>"#;

const DEFAULT_SIDEBAR: &str = r#"
    <aside class="sidebar">
      <p>Sidebar content</p>
    </aside>"#;

const DEFAULT_FOOTER: &str = r#"<footer class="footer">
  <p>{{ copyright }}</p>
</footer>"#;

const DEFAULT_SCRIPT: &str = r#"<script src="bundle.js"></script>"#;

const DEFAULT_JS: &str = r#"document.documentElement.classList.add('js');
"#;

const DEFAULT_INDEX: &str = r#"<h1>Welcome</h1>
<p>This page lives in <code>src/pages/index.html</code>.</p>
"#;

const DEFAULT_ABOUT: &str = r#"# About

This page is written in Markdown and rendered without a sidebar.
"#;

const DEFAULT_CSS: &str = r#"body {
  margin: 0;
  font-family: system-ui, sans-serif;
}

.main {
  display: flex;
  gap: 2rem;
}

.content-with-sidebar {
  flex: 3;
}

.content-no-sidebar {
  flex: 1;
}

.sidebar {
  flex: 1;
}

.active-page {
  font-weight: bold;
}
"#;

const DEFAULT_ROBOTS: &str = "User-agent: *\nAllow: /\n";
