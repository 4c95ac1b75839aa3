//! Containment-checked path resolution below the configured root.
//!
//! Requested paths are normalized lexically first, so a `..` that climbs above
//! the root is rejected without touching the filesystem. The surviving path
//! is then canonicalized and compared to the root component by component;
//! `Path::starts_with` never lets `/data-evil` pass for `/data`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::PeriscopeError;

/// What the calling route expects to find at the resolved path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Directory,
    File,
}

/// Normalize `relative` against `root` without consulting the filesystem.
fn normalize(root: &Path, relative: &str) -> Result<PathBuf, PeriscopeError> {
    if relative.contains('\0') {
        return Err(PeriscopeError::NotFound(relative.replace('\0', "")));
    }

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

    for component in Path::new(relative.trim_start_matches('/')).components() {
        match component {
            Component::Normal(name) => parts.push(name),
            Component::CurDir => continue,
            Component::ParentDir => {
                if parts.pop().is_none() {
                    warn!("Path traversal attempt detected: {:?}", relative);
                    return Err(PeriscopeError::PathTraversal);
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                warn!("Absolute path component in relative path: {:?}", relative);
                return Err(PeriscopeError::PathTraversal);
            }
        }
    }

    let mut result = root.to_path_buf();
    result.extend(parts);
    Ok(result)
}

/// Resolve `relative` below the canonical `root`, following symlinks.
///
/// The result is canonical and guaranteed to be `root` or one of its
/// descendants.
pub fn resolve(root: &Path, relative: &str) -> Result<PathBuf, PeriscopeError> {
    let joined = normalize(root, relative)?;

    let canonical = joined.canonicalize().map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => {
            PeriscopeError::NotFound(relative.to_string())
        }
        _ => PeriscopeError::Io(e),
    })?;

    if !is_within(root, &canonical) {
        warn!(
            "Symlink escape attempt: {:?} resolved to {:?} which is outside {:?}",
            joined, canonical, root
        );
        return Err(PeriscopeError::PathTraversal);
    }

    Ok(canonical)
}

/// Resolve `relative` and check it is the kind of entry the route serves.
pub fn resolve_as(root: &Path, relative: &str, expect: Expect) -> Result<PathBuf, PeriscopeError> {
    let path = resolve(root, relative)?;

    match expect {
        Expect::Directory if !path.is_dir() => Err(PeriscopeError::NotADirectory),
        Expect::File if !path.is_file() => Err(PeriscopeError::NotAFile),
        _ => Ok(path),
    }
}

/// Containment check: `path` equals `root` or descends from it.
pub fn is_within(root: &Path, path: &Path) -> bool {
    path.starts_with(root)
}

/// Canonical target of an on-disk entry, `None` when it cannot be resolved or
/// lands outside `root` (which must itself be canonical).
///
/// Used by the lister, tree builder and search so that a symlink is shown only
/// when the resolver would also accept it.
pub fn canonical_within(root: &Path, path: &Path) -> Option<PathBuf> {
    let canonical = match path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            debug!("Skipping unresolvable entry {}: {}", path.display(), e);
            return None;
        }
    };
    if !is_within(root, &canonical) {
        debug!(
            "Skipping {}: target {} is outside the root",
            path.display(),
            canonical.display()
        );
        return None;
    }
    Some(canonical)
}

/// Root-relative form of `path` joined with `/`, empty for the root itself.
pub fn relative_url_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        std::fs::create_dir_all(root.join("subdir1/nested")).unwrap();
        std::fs::write(root.join("subdir1/image2.png"), b"png").unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_normalize_empty_and_dot() {
        let root = PathBuf::from("/tmp/periscope");
        assert_eq!(normalize(&root, "").unwrap(), root);
        assert_eq!(normalize(&root, ".").unwrap(), root);
        assert_eq!(normalize(&root, "/").unwrap(), root);
    }

    #[test]
    fn test_normalize_collapses_parent_inside_root() {
        let root = PathBuf::from("/tmp/periscope");
        assert_eq!(normalize(&root, "a/b/../c").unwrap(), root.join("a/c"));
        assert_eq!(normalize(&root, "a/..").unwrap(), root);
    }

    #[test]
    fn test_normalize_rejects_escape() {
        let root = PathBuf::from("/tmp/periscope");
        assert!(matches!(normalize(&root, ".."), Err(PeriscopeError::PathTraversal)));
        assert!(matches!(normalize(&root, "../../etc"), Err(PeriscopeError::PathTraversal)));
        assert!(matches!(normalize(&root, "a/../../etc"), Err(PeriscopeError::PathTraversal)));
    }

    #[test]
    fn test_normalize_rejects_null_bytes() {
        let root = PathBuf::from("/tmp/periscope");
        assert!(matches!(normalize(&root, "file\0.png"), Err(PeriscopeError::NotFound(_))));
    }

    #[test]
    fn test_resolve_existing_paths() {
        let (_guard, root) = fixture();
        assert_eq!(resolve(&root, "").unwrap(), root);
        assert_eq!(resolve(&root, "subdir1").unwrap(), root.join("subdir1"));
        assert_eq!(
            resolve(&root, "subdir1/nested/../image2.png").unwrap(),
            root.join("subdir1/image2.png")
        );
    }

    #[test]
    fn test_resolve_escape_is_forbidden_even_when_missing() {
        let (_guard, root) = fixture();
        assert!(matches!(resolve(&root, "../../etc"), Err(PeriscopeError::PathTraversal)));
        assert!(matches!(
            resolve(&root, "../does-not-exist"),
            Err(PeriscopeError::PathTraversal)
        ));
    }

    #[test]
    fn test_resolve_missing_is_not_found() {
        let (_guard, root) = fixture();
        assert!(matches!(resolve(&root, "nope"), Err(PeriscopeError::NotFound(_))));
        assert!(matches!(
            resolve(&root, "subdir1/image2.png/child"),
            Err(PeriscopeError::NotFound(_)) | Err(PeriscopeError::Io(_))
        ));
    }

    #[test]
    fn test_sibling_prefix_is_not_inside_root() {
        let parent = TempDir::new().unwrap();
        let parent = parent.path().canonicalize().unwrap();
        let root = parent.join("data");
        let evil = parent.join("data-evil");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&evil).unwrap();

        assert!(!is_within(&root, &evil));
        assert!(is_within(&root, &root));
        assert!(is_within(&root, &root.join("x")));
        assert!(matches!(resolve(&root, "../data-evil"), Err(PeriscopeError::PathTraversal)));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_detects_symlink_escape() {
        let (_guard, root) = fixture();
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret.png"), b"secret").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("subdir1/escape")).unwrap();

        assert!(matches!(
            resolve(&root, "subdir1/escape/secret.png"),
            Err(PeriscopeError::PathTraversal)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_canonical_within_filters_symlink_targets() {
        let (_guard, root) = fixture();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("away")).unwrap();
        std::os::unix::fs::symlink(root.join("subdir1"), root.join("alias")).unwrap();
        std::os::unix::fs::symlink(root.join("missing"), root.join("dangling")).unwrap();

        assert_eq!(canonical_within(&root, &root.join("alias")), Some(root.join("subdir1")));
        assert_eq!(canonical_within(&root, &root.join("away")), None);
        assert_eq!(canonical_within(&root, &root.join("dangling")), None);
    }

    #[test]
    fn test_resolve_as_checks_kind() {
        let (_guard, root) = fixture();
        assert!(resolve_as(&root, "subdir1", Expect::Directory).is_ok());
        assert!(matches!(
            resolve_as(&root, "subdir1", Expect::File),
            Err(PeriscopeError::NotAFile)
        ));
        assert!(matches!(
            resolve_as(&root, "subdir1/image2.png", Expect::Directory),
            Err(PeriscopeError::NotADirectory)
        ));
        assert!(resolve_as(&root, "subdir1/image2.png", Expect::File).is_ok());
    }

    #[test]
    fn test_relative_url_path() {
        let root = PathBuf::from("/srv/images");
        assert_eq!(relative_url_path(&root, &root), "");
        assert_eq!(relative_url_path(&root, &root.join("a/b.png")), "a/b.png");
        assert_eq!(relative_url_path(&root, Path::new("/elsewhere")), "");
    }
}
