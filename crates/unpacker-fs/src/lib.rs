//! Filesystem helpers shared by the unpacker crates.
//!
//! - `scratch.rs` - per-request scratch directory, removed on drop
//! - `walk.rs` - lazy recursive walk over regular files

pub use error::{Error, Result};
pub use scratch::ScratchDir;
pub use walk::{Files, walk_files};

mod error;
mod scratch;
mod walk;
