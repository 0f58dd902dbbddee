//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use stitch_static::{SiteConfig, StaticBuilder};

/// Load the config file, failing with a hint when it is missing.
fn load_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        anyhow::bail!(
            "Config file not found: {}. Run 'stitch init' first.",
            path.display()
        );
    }

    let config = SiteConfig::load(path)?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut SiteConfig, output: Option<PathBuf>, minify: bool) {
    if let Some(output) = output {
        config.build.output = output;
    }
    if minify {
        config.build.minify = true;
    }
}

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: bool) -> Result<()> {
    tracing::info!("Building static site...");

    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, output, minify);

    let result = StaticBuilder::new(config)
        .build()
        .await
        .context("Build failed")?;

    tracing::info!(
        "Built {} pages, bundled {} scripts and copied {} assets in {}ms",
        result.pages,
        result.scripts,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn flags_override_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("stitch.toml");
        fs::write(&path, "[general]\nlang = \"en\"\n[build]\noutput = \"public\"\n").unwrap();
        let mut config = load_config(&path).unwrap();

        apply_overrides(&mut config, Some(PathBuf::from("out")), true);

        assert_eq!(config.build.output, PathBuf::from("out"));
        assert!(config.build.minify);
    }

    #[test]
    fn keeps_config_values_without_flags() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("stitch.toml");
        fs::write(&path, "[general]\nlang = \"en\"\n[build]\noutput = \"public\"\n").unwrap();
        let mut config = load_config(&path).unwrap();

        apply_overrides(&mut config, None, false);

        assert_eq!(config.build.output, PathBuf::from("public"));
        assert!(!config.build.minify);
    }

    #[test]
    fn missing_config_is_an_error() {
        let temp = tempdir().unwrap();

        let err = load_config(&temp.path().join("stitch.toml")).unwrap_err();

        assert!(err.to_string().contains("stitch init"));
    }
}
