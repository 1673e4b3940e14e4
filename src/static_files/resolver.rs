use std::path::{Path, PathBuf};

use crate::http::percent;

/// File served for directories and paths ending in `/`.
pub const INDEX_FILE: &str = "index.html";
/// Optional custom not-found page at the top of the root.
pub const NOT_FOUND_FILE: &str = "404.html";

/// Outcome of resolving a request path against the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An existing regular file, served with 200.
    Found(PathBuf),
    /// Nothing to serve; `page` is the root's `404.html` if it exists.
    NotFound { page: Option<PathBuf> },
}

/// Maps request paths onto files below a root directory.
///
/// `..` segments are passed through to the filesystem as-is, and a decoded
/// path that starts with `/` (from `%2F`) is taken as absolute, replacing the
/// root. With `reject_traversal` set, both are refused and never found.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    reject_traversal: bool,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>, reject_traversal: bool) -> Self {
        Self {
            root: root.into(),
            reject_traversal,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The filesystem path a request path points at, before any existence
    /// checks. `None` when the path is refused outright.
    ///
    /// `request_path` is the still-encoded path from the request line.
    pub fn candidate(&self, request_path: &str) -> Option<PathBuf> {
        let relative = percent::decode(&index_target(request_path));

        let mut path = if relative.starts_with('/') {
            if self.reject_traversal {
                return None;
            }
            PathBuf::from("/")
        } else {
            self.root.clone()
        };

        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." && self.reject_traversal {
                return None;
            }
            path.push(segment);
        }
        Some(path)
    }

    /// Resolves a request path, applying the directory-index and not-found
    /// fallbacks.
    pub async fn resolve(&self, request_path: &str) -> Resolution {
        let Some(mut path) = self.candidate(request_path) else {
            return self.not_found().await;
        };

        if is_dir(&path).await {
            path.push(INDEX_FILE);
        }

        if is_file(&path).await {
            Resolution::Found(path)
        } else {
            self.not_found().await
        }
    }

    async fn not_found(&self) -> Resolution {
        let page = self.root.join(NOT_FOUND_FILE);
        let page = if is_file(&page).await { Some(page) } else { None };
        Resolution::NotFound { page }
    }
}

/// Strips leading slashes and appends `index.html` to empty paths and paths
/// ending in `/`.
pub fn index_target(request_path: &str) -> String {
    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() || relative.ends_with('/') {
        format!("{relative}{INDEX_FILE}")
    } else {
        relative.to_string()
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
