use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::listing::{url_for, FileEntry, FileKind};
use crate::resolver::{canonical_within, relative_url_path};

/// Recursively find displayable files under `start` whose name contains `query`.
///
/// URLs are built relative to the canonical `root` so results stay valid
/// whatever directory the search started from. Matching is case-sensitive.
/// Symlinks are followed only while their target stays inside `root`; loops
/// are reported by walkdir and skipped.
pub fn search(config: &Config, start: &Path, query: &str, root: &Path) -> Vec<FileEntry> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut files = Vec::new();

    let walker = WalkDir::new(start)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| canonical_within(root, e.path()).is_some());

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable entry during search: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 name: {}", entry.path().display());
            continue;
        };
        if !name.contains(query) {
            continue;
        }

        let Some(kind) = FileKind::classify(config, entry.path()) else {
            continue;
        };

        let relative = relative_url_path(root, entry.path());
        let relative = if relative.is_empty() { name.clone() } else { relative };

        files.push(FileEntry {
            url: url_for(kind.route(), &relative),
            name,
            kind,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}
