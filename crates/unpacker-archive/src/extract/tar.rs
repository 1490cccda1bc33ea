use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::Extract;
use crate::error::{Error, Result};
use crate::format::TarCompress;
use crate::sanitize::resolve_entry;

#[derive(Clone, Copy, Debug)]
pub struct TarExtractor {
    codec: TarCompress,
}

impl TarExtractor {
    pub fn new(codec: TarCompress) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> TarCompress {
        self.codec
    }
}

impl Extract for TarExtractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let reader = self.codec.decoder(BufReader::new(File::open(archive)?))?;
        let mut archive = ::tar::Archive::new(reader);
        archive.set_overwrite(true);
        archive.set_preserve_mtime(true);

        let entries = archive
            .entries()
            .map_err(|e| Error::Corrupted(e.to_string()))?;

        // directory modes are applied last so read-only directories can
        // still receive their children
        let mut directories = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::Corrupted(e.to_string()))?;
            let raw_path = entry
                .path()
                .map_err(|e| Error::Corrupted(e.to_string()))?
                .into_owned();
            let target = resolve_entry(&raw_path, destination)?;

            if entry.header().entry_type().is_dir() {
                directories.push((raw_path, target, entry));
                continue;
            }
            unpack_entry(entry, raw_path, destination)?;
        }

        // children before parents
        directories.sort_by(|(a, ..), (b, ..)| b.cmp(a));
        for (raw_path, target, entry) in directories {
            unpack_entry(entry, raw_path, destination)?;
            keep_owner_access(&target)?;
        }

        Ok(())
    }
}

fn unpack_entry<R: Read>(
    mut entry: ::tar::Entry<'_, R>,
    raw_path: PathBuf,
    destination: &Path,
) -> Result<()> {
    match entry.unpack_in(destination) {
        Ok(true) => Ok(()),
        // unpack_in() skips entries it considers unsafe without an error
        Ok(false) => Err(Error::ZipSlip { entry: raw_path }),
        Err(source) => Err(Error::ExtractionFailed {
            path: raw_path,
            source,
        }),
    }
}

/// Extracted directories always stay listable and removable by their owner.
#[cfg(unix)]
fn keep_owner_access(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::symlink_metadata(dir)?.permissions().mode();
    if mode & 0o700 != 0o700 {
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(mode | 0o700))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn keep_owner_access(_dir: &Path) -> Result<()> {
    Ok(())
}
