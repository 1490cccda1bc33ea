//! Per-format extraction behind a single [`Extract`] interface.
//!
//! zip and tar-family archives are unpacked in process. rar archives are
//! handed to an external `unrar` binary. Callers only see
//! [`crate::Error`], whichever extractor ran.

use std::path::Path;

use crate::error::Result;
use crate::format::ArchiveKind;
use crate::options::ExtractOptions;

mod rar;
mod tar;
mod zip;

pub use rar::RarExtractor;
pub use tar::TarExtractor;
pub use zip::ZipExtractor;

pub trait Extract {
    /// Unpack every entry of `archive` into `destination`.
    ///
    /// `destination` must already exist. Relative entry paths are kept and
    /// existing files are overwritten.
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;
}

#[derive(Clone, Debug)]
pub enum Extractor {
    Zip(ZipExtractor),
    Tar(TarExtractor),
    Rar(RarExtractor),
}

impl Extractor {
    /// Extractor for a classified archive, or `None` for
    /// [`ArchiveKind::Unsupported`].
    pub fn for_kind(kind: ArchiveKind, options: &ExtractOptions) -> Option<Self> {
        match kind {
            ArchiveKind::Zip => Some(Self::Zip(ZipExtractor)),
            ArchiveKind::Tar(codec) => Some(Self::Tar(TarExtractor::new(codec))),
            ArchiveKind::Rar => Some(Self::Rar(RarExtractor::new(&options.unrar))),
            ArchiveKind::Unsupported => None,
        }
    }

    pub fn kind(&self) -> ArchiveKind {
        match self {
            Self::Zip(_) => ArchiveKind::Zip,
            Self::Tar(extractor) => ArchiveKind::Tar(extractor.codec()),
            Self::Rar(_) => ArchiveKind::Rar,
        }
    }
}

impl Extract for Extractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        tracing::info!(
            archive = %archive.display(),
            destination = %destination.display(),
            kind = %self.kind(),
            "extracting archive"
        );
        let result = match self {
            Self::Zip(extractor) => extractor.extract(archive, destination),
            Self::Tar(extractor) => extractor.extract(archive, destination),
            Self::Rar(extractor) => extractor.extract(archive, destination),
        };
        match &result {
            Ok(()) => tracing::info!(kind = %self.kind(), "archive extracted"),
            Err(e) => tracing::error!(kind = %self.kind(), error = %e, "extraction failed"),
        }
        result
    }
}

/// Create `dir` and its parents when missing.
pub(crate) fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| crate::Error::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TarCompress;

    #[test]
    fn unsupported_has_no_extractor() {
        assert!(Extractor::for_kind(ArchiveKind::Unsupported, &ExtractOptions::default()).is_none());
    }

    #[test]
    fn extractor_kind_round_trips() {
        let options = ExtractOptions::default();
        for kind in [
            ArchiveKind::Zip,
            ArchiveKind::Tar(TarCompress::None),
            ArchiveKind::Tar(TarCompress::Gzip),
            ArchiveKind::Tar(TarCompress::Bzip2),
            ArchiveKind::Rar,
        ] {
            let extractor = Extractor::for_kind(kind, &options).unwrap();
            assert_eq!(extractor.kind(), kind);
        }
    }

    #[test]
    fn rar_extractor_uses_configured_program() {
        let options = ExtractOptions::default().unrar("/opt/bin/unrar");
        let Some(Extractor::Rar(rar)) = Extractor::for_kind(ArchiveKind::Rar, &options) else {
            panic!("expected rar extractor");
        };
        assert_eq!(rar.program(), Path::new("/opt/bin/unrar"));
    }

    #[test]
    fn ensure_directory_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_directory(&nested).unwrap();
    }
}
