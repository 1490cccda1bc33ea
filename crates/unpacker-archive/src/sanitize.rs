use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an archive entry path against `base`.
///
/// `.` components are dropped. Absolute entries and entries with any `..`
/// component are rejected (zip-slip), even when they would stay inside
/// `base`.
pub fn resolve_entry(entry: impl AsRef<Path>, base: impl AsRef<Path>) -> Result<PathBuf> {
    let entry = entry.as_ref();
    let zip_slip = || Error::ZipSlip {
        entry: entry.to_path_buf(),
    };

    let mut relative = PathBuf::new();
    for component in entry.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(zip_slip());
            }
        }
    }

    Ok(base.as_ref().join(relative))
}
