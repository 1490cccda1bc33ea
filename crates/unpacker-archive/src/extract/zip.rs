use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use super::{Extract, ensure_directory};
use crate::error::{Error, Result};
use crate::sanitize::resolve_entry;

#[derive(Clone, Copy, Debug, Default)]
pub struct ZipExtractor;

impl Extract for ZipExtractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let reader = BufReader::new(File::open(archive)?);
        let mut archive = ::zip::ZipArchive::new(reader)?;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;

            // enclosed_name() refuses absolute and escaping names
            let raw_path = file
                .enclosed_name()
                .ok_or_else(|| Error::ZipSlip {
                    entry: PathBuf::from(file.name()),
                })?
                .to_path_buf();
            let target = resolve_entry(&raw_path, destination)?;

            if file.is_dir() {
                ensure_directory(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                ensure_directory(parent)?;
            }

            let extraction_failed = |source| Error::ExtractionFailed {
                path: raw_path.clone(),
                source,
            };
            let mut out_file = create_replacing(&target).map_err(extraction_failed)?;
            io::copy(&mut file, &mut out_file).map_err(extraction_failed)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    // keep exec bits, never drop owner read/write
                    let perms = std::fs::Permissions::from_mode((mode & 0o777) | 0o600);
                    std::fs::set_permissions(&target, perms)?;
                }
            }
        }

        Ok(())
    }
}

/// Create `target`, unlinking any existing file first instead of truncating
/// it. The entry may share its path with the archive still being read.
fn create_replacing(target: &Path) -> io::Result<File> {
    match std::fs::remove_file(target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    File::create(target)
}
