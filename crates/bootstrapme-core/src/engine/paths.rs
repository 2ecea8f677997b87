//! Containment check for template file paths.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Join a preset-relative `path` onto `root`, rejecting anything that would
/// land outside of it.
///
/// The check is lexical: absolute paths, drive prefixes and `..` components
/// that climb above the root are refused. `..` that stays inside the root
/// (`src/../README.md`) is allowed.
pub fn resolve_within_root(root: &Path, path: &str) -> Result<PathBuf> {
    let relative = Path::new(path);
    let mut depth: usize = 0;
    let mut saw_normal = false;

    for component in relative.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(Error::path_escape(path));
            }
            Component::CurDir => {}
            Component::ParentDir => {
                depth = depth.checked_sub(1).ok_or_else(|| Error::path_escape(path))?;
            }
            Component::Normal(_) => {
                depth += 1;
                saw_normal = true;
            }
        }
    }

    if !saw_normal || depth == 0 {
        return Err(Error::path_escape(path));
    }

    Ok(root.join(relative))
}
