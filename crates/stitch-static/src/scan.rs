//! Recursive file discovery.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::fs;

/// Which file extensions a scan accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionFilter {
    /// Every file, including files without an extension
    Any,
    Single(String),
    OneOf(Vec<String>),
}

impl ExtensionFilter {
    pub fn single(ext: impl Into<String>) -> Self {
        Self::Single(ext.into())
    }

    pub fn one_of<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(exts.into_iter().map(Into::into).collect())
    }

    /// Check an extension as returned by [`extension_of`].
    pub fn accepts(&self, ext: Option<&str>) -> bool {
        match (self, ext) {
            (Self::Any, _) => true,
            (_, None) => false,
            (Self::Single(wanted), Some(ext)) => wanted == ext,
            (Self::OneOf(wanted), Some(ext)) => wanted.iter().any(|w| w == ext),
        }
    }
}

/// Extension of a file name: the segment after the first `.`.
///
/// `archive.tar.gz` yields `tar`; a name without a dot has none.
pub fn extension_of(file_name: &str) -> Option<&str> {
    file_name.split('.').nth(1)
}

/// Key of a file name: everything before the first `.`.
pub fn key_of(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Errors that can occur while scanning.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to inspect {}: {source}", path.display())]
    Entry {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Recursively collect every file under `root` whose extension passes `filter`.
///
/// Results are depth-first in directory listing order, which is not sorted.
/// Any unreadable directory fails the whole scan.
pub async fn scan(root: &Path, filter: &ExtensionFilter) -> Result<Vec<PathBuf>, ScanError> {
    let mut found = Vec::new();
    scan_into(root, filter, &mut found).await?;
    Ok(found)
}

fn scan_into<'a>(
    dir: &'a Path,
    filter: &'a ExtensionFilter,
    found: &'a mut Vec<PathBuf>,
) -> Pin<Box<dyn Future<Output = Result<(), ScanError>> + Send + 'a>> {
    Box::pin(async move {
        let read_dir_error = |source| ScanError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir).await.map_err(read_dir_error)?;

        while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == "." || name == ".." {
                continue;
            }

            let path = entry.path();

            // Symlinks are not followed.
            let file_type = entry.file_type().await.map_err(|source| ScanError::Entry {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                scan_into(&path, filter, found).await?;
            } else if filter.accepts(extension_of(&name)) {
                found.push(path);
            }
        }

        Ok(())
    })
}
