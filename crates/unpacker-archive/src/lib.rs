//! Archive classification, extraction and output collection.
//!
//! # Architecture
//!
//! - `format.rs` - content sniffing and [`classify`]
//! - `extract/` - per-format extractors behind [`Extract`]
//! - `sanitize.rs` - entry path resolution (zip-slip prevention)
//! - `collect.rs` - walk of the extracted files

pub use collect::{Outputs, collect_outputs};
pub use error::{Error, Result};
pub use extract::{Extract, Extractor, RarExtractor, TarExtractor, ZipExtractor};
pub use format::{ArchiveKind, TarCompress, classify, is_tar_header};
pub use options::ExtractOptions;

mod collect;
mod error;
pub mod extract;
pub mod format;
mod options;
mod sanitize;
