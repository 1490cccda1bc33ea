use std::path::{Path, PathBuf};

const DEFAULT_UNRAR: &str = "unrar";

/// Settings shared by every extractor.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Program used for rar archives. Looked up on `PATH` when it is a bare
    /// name.
    pub unrar: PathBuf,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            unrar: PathBuf::from(DEFAULT_UNRAR),
        }
    }
}

impl ExtractOptions {
    pub fn unrar(mut self, program: impl AsRef<Path>) -> Self {
        self.unrar = program.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_unrar_program() {
        assert_eq!(ExtractOptions::default().unrar, Path::new("unrar"));
    }

    #[test]
    fn unrar_override() {
        let options = ExtractOptions::default().unrar("/opt/rar/unrar");
        assert_eq!(options.unrar, Path::new("/opt/rar/unrar"));
    }
}
