use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::Error;

const TAR_BLOCK: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar(TarCompress),
    Rar,
    Unsupported,
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zip => f.write_str("zip"),
            Self::Tar(TarCompress::None) => f.write_str("tar"),
            Self::Tar(codec) => write!(f, "tar+{codec}"),
            Self::Rar => f.write_str("rar"),
            Self::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Compression codec for tar archives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TarCompress {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl std::fmt::Display for TarCompress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        })
    }
}

impl TarCompress {
    /// Pick a codec from the leading bytes of a file. Unknown data is `None`,
    /// which means "try it as a plain tar".
    pub fn from_magic(data: &[u8]) -> Self {
        match data {
            [0x1F, 0x8B, ..] => Self::Gzip,
            [b'B', b'Z', b'h', ..] => Self::Bzip2,
            [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => Self::Xz,
            [0x28, 0xB5, 0x2F, 0xFD, ..] => Self::Zstd,
            _ => Self::None,
        }
    }

    /// Create a decoder for this compression codec.
    pub fn decoder<R: Read>(self, reader: R) -> Result<Decoder<R>, Error> {
        match self {
            Self::None => Ok(Decoder::Passthrough(reader)),
            Self::Gzip => Ok(Decoder::Gzip(Box::new(flate2::read::GzDecoder::new(
                reader,
            )))),
            Self::Bzip2 => Ok(Decoder::Bzip2(Box::new(bzip2::read::BzDecoder::new(
                reader,
            )))),
            #[cfg(feature = "xz")]
            Self::Xz => Ok(Decoder::Xz(Box::new(xz2::read::XzDecoder::new(reader)))),
            #[cfg(not(feature = "xz"))]
            Self::Xz => Err(Error::UnsupportedFormat),
            #[cfg(feature = "zstd")]
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::new(reader)
                    .map_err(|e| Error::Corrupted(e.to_string()))?;
                Ok(Decoder::Zstd(Box::new(decoder)))
            }
            #[cfg(not(feature = "zstd"))]
            Self::Zstd => Err(Error::UnsupportedFormat),
        }
    }
}

/// Decoder wrapper for tar decompression.
pub enum Decoder<R: Read> {
    Passthrough(R),
    Gzip(Box<flate2::read::GzDecoder<R>>),
    Bzip2(Box<bzip2::read::BzDecoder<R>>),
    #[cfg(feature = "xz")]
    Xz(Box<xz2::read::XzDecoder<R>>),
    #[cfg(feature = "zstd")]
    Zstd(Box<zstd::stream::read::Decoder<'static, BufReader<R>>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            Self::Bzip2(d) => d.read(buf),
            #[cfg(feature = "xz")]
            Self::Xz(d) => d.read(buf),
            #[cfg(feature = "zstd")]
            Self::Zstd(d) => d.read(buf),
        }
    }
}

/// True when `block` starts with a tar header whose checksum matches.
///
/// Covers ustar, GNU and v7 headers alike. An all-zero block (end of
/// archive) is not a header.
pub fn is_tar_header(block: &[u8]) -> bool {
    let Some(header) = block.get(..TAR_BLOCK) else {
        return false;
    };
    let Some(stored) = parse_octal(&header[148..156]) else {
        return false;
    };

    // The checksum is computed with its own field read as eight spaces.
    let unsigned: u64 = header
        .iter()
        .enumerate()
        .map(|(i, &b)| if (148..156).contains(&i) { b' ' } else { b })
        .map(u64::from)
        .sum();
    let signed: i64 = header
        .iter()
        .enumerate()
        .map(|(i, &b)| if (148..156).contains(&i) { b' ' as i8 } else { b as i8 })
        .map(i64::from)
        .sum();

    stored == unsigned || i64::try_from(stored).is_ok_and(|s| s == signed)
}

fn parse_octal(field: &[u8]) -> Option<u64> {
    let digits: Vec<u8> = field
        .iter()
        .copied()
        .skip_while(|&b| b == b' ')
        .take_while(|&b| (b'0'..=b'7').contains(&b))
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits
        .iter()
        .try_fold(0u64, |acc, &d| acc.checked_mul(8)?.checked_add(u64::from(d - b'0')))
}

type Probe = fn(&Path) -> Option<ArchiveKind>;

/// Probes in evaluation order; the first match wins.
const PROBES: [Probe; 3] = [probe_zip, probe_tar, probe_rar_extension];

/// Classify the file at `path`.
///
/// zip and tar-family are recognised by content, rar only by its `.rar`
/// extension. Unreadable or unrecognised files are
/// [`ArchiveKind::Unsupported`].
pub fn classify(path: impl AsRef<Path>) -> ArchiveKind {
    let path = path.as_ref();
    let kind = PROBES
        .iter()
        .find_map(|probe| probe(path))
        .unwrap_or(ArchiveKind::Unsupported);
    tracing::debug!(path = %path.display(), %kind, "classified file");
    kind
}

fn probe_zip(path: &Path) -> Option<ArchiveKind> {
    let file = File::open(path).ok()?;
    zip::ZipArchive::new(BufReader::new(file))
        .is_ok()
        .then_some(ArchiveKind::Zip)
}

fn probe_tar(path: &Path) -> Option<ArchiveKind> {
    let mut magic = Vec::with_capacity(8);
    File::open(path).ok()?.take(8).read_to_end(&mut magic).ok()?;
    let codec = TarCompress::from_magic(&magic);

    let file = BufReader::new(File::open(path).ok()?);
    let mut block = Vec::with_capacity(TAR_BLOCK);
    codec
        .decoder(file)
        .ok()?
        .take(TAR_BLOCK as u64)
        .read_to_end(&mut block)
        .ok()?;

    is_tar_header(&block).then_some(ArchiveKind::Tar(codec))
}

fn probe_rar_extension(path: &Path) -> Option<ArchiveKind> {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("rar"))
        .then_some(ArchiveKind::Rar)
}
