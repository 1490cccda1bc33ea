use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create scratch directory in '{root}': {source}")]
    ScratchCreate {
        root: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove scratch directory '{path}': {source}")]
    ScratchRemove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid file name: '{0}'")]
    InvalidFileName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
