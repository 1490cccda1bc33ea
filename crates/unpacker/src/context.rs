use std::path::PathBuf;

use unpacker_archive::ExtractOptions;

use crate::config::Config;

/// Everything a handler needs, built once at startup and shared read-only
/// between requests.
#[derive(Debug)]
pub struct AppContext {
    config: Config,
    extract: ExtractOptions,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let extract = ExtractOptions::default().unrar(&config.unrar);
        Self { config, extract }
    }

    pub fn token(&self) -> &str {
        &self.config.token
    }

    pub fn extract_options(&self) -> &ExtractOptions {
        &self.extract
    }

    pub fn scratch_root(&self) -> PathBuf {
        self.config
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
