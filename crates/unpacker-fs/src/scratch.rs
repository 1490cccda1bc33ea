use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{Error, Result};

/// Directory that lives for exactly one request.
///
/// The directory and everything under it is removed when the value is
/// dropped, so early returns and `?` paths clean up the same way as the
/// happy path. Directories left without owner access (read-only trees from
/// an archive) are unlocked before removal. Use [`ScratchDir::close`] to
/// observe removal errors.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ScratchDir {
    /// Create a fresh directory under `root`, creating `root` first if needed.
    pub fn new_in(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let scratch_create = |source| Error::ScratchCreate {
            root: root.to_path_buf(),
            source,
        };

        if !root.exists() {
            std::fs::create_dir_all(root).map_err(scratch_create)?;
        }

        let dir = tempfile::Builder::new()
            .prefix("unpacker-")
            .tempdir_in(root)
            .map_err(scratch_create)?;

        tracing::debug!(path = %dir.path().display(), "created scratch directory");
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path for a user supplied file name inside the scratch directory.
    ///
    /// Only the final component of `declared` is kept, so names such as
    /// `../../etc/passwd` stay inside the directory.
    pub fn child(&self, declared: &str) -> Result<PathBuf> {
        let name = Path::new(declared)
            .file_name()
            .ok_or_else(|| Error::InvalidFileName(declared.to_owned()))?;
        Ok(self.path.join(name))
    }

    pub fn close(mut self) -> Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        restore_owner_access(&self.path);
        let path = self.path.clone();
        dir.close()
            .map_err(|source| Error::ScratchRemove { path, source })
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            restore_owner_access(&self.path);
            drop(dir);
        }
    }
}

/// Give the owner `rwx` on every directory below `root`.
#[cfg(unix)]
fn restore_owner_access(root: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        if let Ok(meta) = std::fs::symlink_metadata(&dir) {
            let mode = meta.permissions().mode();
            if mode & 0o700 != 0o700 {
                let unlocked = std::fs::Permissions::from_mode(mode | 0o700);
                if let Err(e) = std::fs::set_permissions(&dir, unlocked) {
                    tracing::debug!(dir = %dir.display(), error = %e, "cannot unlock directory");
                }
            }
        }

        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            if entry.file_type().is_ok_and(|ty| ty.is_dir()) {
                pending.push(entry.path());
            }
        }
    }
}

#[cfg(not(unix))]
fn restore_owner_access(_root: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scratch_created_under_root() -> Result<()> {
        let root = tempdir().unwrap();
        let scratch = ScratchDir::new_in(root.path())?;
        assert!(scratch.path().is_dir());
        assert!(scratch.path().starts_with(root.path()));
        Ok(())
    }

    #[test]
    fn test_scratch_creates_missing_root() -> Result<()> {
        let root = tempdir().unwrap();
        let nested = root.path().join("a/b");
        let scratch = ScratchDir::new_in(&nested)?;
        assert!(scratch.path().starts_with(&nested));
        Ok(())
    }

    #[test]
    fn test_scratch_cleanup_on_drop() -> Result<()> {
        let root = tempdir().unwrap();
        let scratch = ScratchDir::new_in(root.path())?;
        let path = scratch.path().to_path_buf();
        std::fs::create_dir_all(path.join("sub")).unwrap();
        std::fs::write(path.join("sub/file.txt"), b"data").unwrap();

        drop(scratch);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_scratch_close_removes_directory() -> Result<()> {
        let root = tempdir().unwrap();
        let scratch = ScratchDir::new_in(root.path())?;
        let path = scratch.path().to_path_buf();
        scratch.close()?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_child_keeps_final_component() -> Result<()> {
        let root = tempdir().unwrap();
        let scratch = ScratchDir::new_in(root.path())?;
        assert_eq!(scratch.child("data.zip")?, scratch.path().join("data.zip"));
        assert_eq!(
            scratch.child("../../etc/passwd")?,
            scratch.path().join("passwd")
        );
        Ok(())
    }

    #[test]
    fn test_child_rejects_empty_and_parent() {
        let root = tempdir().unwrap();
        let scratch = ScratchDir::new_in(root.path()).unwrap();
        assert!(matches!(scratch.child(""), Err(Error::InvalidFileName(_))));
        assert!(matches!(scratch.child(".."), Err(Error::InvalidFileName(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_scratch_drop_removes_read_only_tree() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let root = tempdir().unwrap();
        let scratch = ScratchDir::new_in(root.path())?;
        let locked = scratch.path().join("locked/deeper");
        std::fs::create_dir_all(&locked).unwrap();
        std::fs::write(locked.join("file.txt"), b"data").unwrap();
        for dir in [locked.clone(), scratch.path().join("locked")] {
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o500)).unwrap();
        }

        let path = scratch.path().to_path_buf();
        drop(scratch);
        assert!(!path.exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_scratch_close_removes_read_only_tree() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let root = tempdir().unwrap();
        let scratch = ScratchDir::new_in(root.path())?;
        let locked = scratch.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("file.txt"), b"data").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        let path = scratch.path().to_path_buf();
        scratch.close()?;
        assert!(!path.exists());
        Ok(())
    }
}
