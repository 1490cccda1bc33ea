use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

/// Lazy depth-first walk over the regular files below a directory.
///
/// Directories are read one at a time as the iterator advances. Symlinks are
/// not followed and not yielded. Directories that cannot be read are logged
/// and skipped.
#[derive(Debug)]
pub struct Files {
    stack: Vec<ReadDir>,
}

pub fn walk_files(root: impl AsRef<Path>) -> Files {
    let mut files = Files { stack: Vec::new() };
    files.descend(root.as_ref());
    files
}

impl Files {
    fn descend(&mut self, dir: &Path) {
        match fs::read_dir(dir) {
            Ok(entries) => self.stack.push(entries),
            Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory"),
        }
    }
}

impl Iterator for Files {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.stack.last_mut()?.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            let path = entry.path();
            match entry.file_type() {
                Ok(ty) if ty.is_dir() => self.descend(&path),
                Ok(ty) if ty.is_file() => return Some(path),
                Ok(_) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "cannot stat entry"),
            }
        }
    }
}
