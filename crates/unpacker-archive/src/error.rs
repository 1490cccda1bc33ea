use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported archive format")]
    UnsupportedFormat,

    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("entry '{entry}' escapes the destination directory")]
    ZipSlip { entry: PathBuf },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("`{program}` failed with {status}")]
    UnpackerExit { program: String, status: ExitStatus },

    #[error(transparent)]
    Command(#[from] unpacker_platform::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(e) => Self::Io(e),
            other => Self::Corrupted(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
