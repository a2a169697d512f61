//! Host path canonicalization for volume bindings.
//!
//! Every host path handed to the container runtime must be absolute and
//! symlink-resolved. The results directory usually does not exist before
//! the first analysis, so canonicalization cannot rely on
//! [`std::fs::canonicalize`] alone: the longest existing ancestor is
//! resolved on disk and the remaining components are appended lexically.

use std::path::{Component, Path, PathBuf};

/// Returns the canonical form of `path`.
///
/// Relative paths are taken relative to the current working directory.
/// Never fails; if no ancestor can be resolved on disk the path is only
/// normalized lexically.
#[must_use]
pub fn canonicalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    canonicalize_absolute(&absolute)
}

/// Resolves `path` against `base` (when relative) and canonicalizes it.
#[must_use]
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        canonicalize(path)
    } else {
        canonicalize(&base.join(path))
    }
}

fn canonicalize_absolute(path: &Path) -> PathBuf {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        if let Ok(resolved) = std::fs::canonicalize(ancestor) {
            if let Ok(rest) = path.strip_prefix(ancestor) {
                return normalize_onto(resolved, rest);
            }
        }
    }
    normalize_onto(PathBuf::new(), path)
}

fn normalize_onto(mut base: PathBuf, rest: &Path) -> PathBuf {
    for component in rest.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let _ = base.pop();
            }
            Component::Normal(part) => base.push(part),
            Component::RootDir | Component::Prefix(_) => base.push(component.as_os_str()),
        }
    }
    base
}
