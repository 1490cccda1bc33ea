use std::fmt;
use std::path::PathBuf;

use clap::Parser;

/// Startup configuration, from flags or the environment.
#[derive(Clone, Parser)]
#[command(name = "unpacker", version, about)]
pub struct Config {
    /// Telegram bot token.
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Program used to extract rar archives.
    #[arg(long, env = "UNRAR_PATH", default_value = "unrar")]
    pub unrar: PathBuf,

    /// Directory that holds per-request scratch directories.
    /// Defaults to the system temporary directory.
    #[arg(long, env = "SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("unrar", &self.unrar)
            .field("scratch_dir", &self.scratch_dir)
            .finish()
    }
}
