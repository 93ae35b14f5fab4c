//! Template lookup by URI

use crate::options::PathOrUrl;
use serde::Serialize;
use std::path::{Path, PathBuf};
use url::Url;

/// A resolved template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// The reference the client sent (after joining with any content root)
    pub uri: String,
    /// Where the template actually lives
    pub location: PathOrUrl,
}

impl Resource {
    /// Split the location into its containing directory and file name.
    pub fn split(&self) -> Option<(PathOrUrl, String)> {
        Some((self.location.parent()?, self.location.file_name()?))
    }
}

/// Template lookup: a URI yields a resource or nothing.
pub trait ResourceLookup: Send + Sync {
    fn lookup(&self, uri: &str) -> Option<Resource>;
}

/// Resolves templates on the local filesystem, confined to a set of directories
#[derive(Debug, Clone, Default)]
pub struct FsResourceLookup {
    template_dirs: Vec<PathBuf>,
}

impl FsResourceLookup {
    /// Lookup confined to `template_dirs`. Relative references are tried against
    /// each directory in order; with no directories, any readable file resolves.
    pub fn new(template_dirs: Vec<PathBuf>) -> Self {
        Self { template_dirs }
    }

    fn candidates(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_absolute() || self.template_dirs.is_empty() {
            vec![path.to_path_buf()]
        } else {
            self.template_dirs.iter().map(|dir| dir.join(path)).collect()
        }
    }

    /// Validate that a path is within the template directories.
    fn validate_path_access(&self, path: &Path) -> Option<PathBuf> {
        let canonical = std::fs::canonicalize(path).ok()?;
        if self.template_dirs.is_empty() {
            return Some(canonical);
        }

        self.template_dirs
            .iter()
            .filter_map(|dir| std::fs::canonicalize(dir).ok())
            .any(|dir| canonical.starts_with(&dir))
            .then_some(canonical)
    }
}

impl ResourceLookup for FsResourceLookup {
    fn lookup(&self, uri: &str) -> Option<Resource> {
        let path = match Url::parse(uri) {
            Ok(url) if url.scheme() == "file" => url.to_file_path().ok()?,
            // Single-letter schemes are drive letters, not URLs.
            Ok(url) if url.scheme().len() > 1 => {
                tracing::debug!(uri, "only file: URLs resolve to local templates");
                return None;
            }
            _ => PathBuf::from(uri),
        };

        let resolved = self
            .candidates(&path)
            .into_iter()
            .filter_map(|candidate| self.validate_path_access(&candidate))
            .find(|candidate| candidate.is_file())?;

        Some(Resource {
            uri: uri.to_string(),
            location: PathOrUrl::Path(resolved),
        })
    }
}
