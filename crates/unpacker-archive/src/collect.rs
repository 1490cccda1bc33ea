use std::path::{Path, PathBuf};

use unpacker_fs::{Files, walk_files};

/// Files produced by an extraction, in walk order.
///
/// Yields absolute paths of regular files below the destination, skipping
/// the archive itself. The walk happens lazily and only once.
pub struct Outputs {
    files: Files,
    archive: PathBuf,
}

impl Iterator for Outputs {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let archive = &self.archive;
        self.files.find(|path| path != archive)
    }
}

/// Walk `destination` after extraction.
///
/// Only the exact path of `archive` is excluded; a file of the same name in
/// a subdirectory is still yielded.
pub fn collect_outputs(destination: impl AsRef<Path>, archive: impl AsRef<Path>) -> Outputs {
    let destination = absolute(destination.as_ref());
    Outputs {
        files: walk_files(&destination),
        archive: absolute(archive.as_ref()),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
