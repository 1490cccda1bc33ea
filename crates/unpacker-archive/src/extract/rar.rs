use std::ffi::OsString;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

use unpacker_platform::command::Command;

use super::Extract;
use crate::error::{Error, Result};

/// `unrar x`: extract with full paths.
const EXTRACT: &str = "x";
/// Keep files that failed their CRC check.
const KEEP_BROKEN: &str = "-kb";
/// Overwrite existing files without asking.
const OVERWRITE: &str = "-o+";

/// Extracts rar archives by running an external `unrar` program.
#[derive(Clone, Debug)]
pub struct RarExtractor {
    program: PathBuf,
}

impl RarExtractor {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, archive: &Path, destination: &Path) -> Command {
        // unrar only treats the last argument as the output directory when it
        // ends with a path separator
        let mut destination: OsString = destination.as_os_str().to_owned();
        if !destination.to_string_lossy().ends_with(MAIN_SEPARATOR_STR) {
            destination.push(MAIN_SEPARATOR_STR);
        }

        Command::new(&self.program)
            .args([EXTRACT, KEEP_BROKEN, OVERWRITE])
            .arg(archive)
            .arg(destination)
            .quiet()
    }
}

impl Extract for RarExtractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let mut command = self.command(archive, destination);
        let status = command.status()?;
        if !status.success() {
            return Err(Error::UnpackerExit {
                program: command.program().to_owned(),
                status,
            });
        }
        Ok(())
    }
}
