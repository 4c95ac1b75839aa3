use std::ffi::OsString;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::resolver::canonical_within;

/// Subdirectory link in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub url: String,
}

/// Displayable file in a listing or search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub url: String,
    pub kind: FileKind,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Html,
}

impl FileKind {
    /// Classify a file by its extension, `None` for files we do not show.
    pub fn classify(config: &Config, path: &Path) -> Option<Self> {
        let ext = format!(".{}", path.extension()?.to_string_lossy());
        if config.is_image_extension(&ext) {
            Some(FileKind::Image)
        } else if config.is_html_extension(&ext) {
            Some(FileKind::Html)
        } else {
            None
        }
    }

    /// Route prefix that serves this kind of file
    pub fn route(self) -> &'static str {
        match self {
            FileKind::Image => "/images",
            FileKind::Html => "/view",
        }
    }
}

/// Join a route prefix and a root-relative path, percent-encoding each segment.
pub fn url_for(route: &str, relative: &str) -> String {
    let encoded = relative
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", route, encoded)
}

/// Join a root-relative base path and a child name.
pub fn join_relative(base: &str, name: &str) -> String {
    let base = base.trim_matches('/');
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", base, name)
    }
}

/// Entry name as UTF-8, `None` (logged) for names that cannot appear in a URL.
pub(crate) fn utf8_name(path: &Path, name: OsString) -> Option<String> {
    match name.into_string() {
        Ok(name) => Some(name),
        Err(_) => {
            debug!("Skipping non UTF-8 name in {}", path.display());
            None
        }
    }
}

/// Immediate subdirectories of `dir`, sorted by name.
///
/// `root` is the canonical root; entries (symlinks included) whose target lies
/// outside it are skipped. Enumeration errors are logged and produce an empty
/// list.
pub fn list_directories(root: &Path, dir: &Path, base: &str) -> Vec<DirectoryEntry> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to list directories in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut result = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read entry in {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let path = entry.path();
        let Some(target) = canonical_within(root, &path) else {
            continue;
        };
        if !target.is_dir() {
            continue;
        }
        let Some(name) = utf8_name(dir, entry.file_name()) else {
            continue;
        };

        let url = url_for("/browse", &join_relative(base, &name));
        result.push(DirectoryEntry { name, url });
    }

    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
}

/// Immediate image and HTML files of `dir`, sorted by name.
///
/// Same containment rule as [`list_directories`]. Enumeration errors are
/// logged and produce an empty list.
pub fn list_files(config: &Config, root: &Path, dir: &Path, base: &str) -> Vec<FileEntry> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to list files in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut result = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read entry in {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let path = entry.path();
        let Some(kind) = FileKind::classify(config, &path) else {
            continue;
        };
        let Some(target) = canonical_within(root, &path) else {
            continue;
        };
        if !target.is_file() {
            continue;
        }
        let Some(name) = utf8_name(dir, entry.file_name()) else {
            continue;
        };

        let url = url_for(kind.route(), &join_relative(base, &name));
        result.push(FileEntry { name, url, kind });
    }

    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
}
