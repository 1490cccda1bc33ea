use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use unpacker::config::Config;
use unpacker::{AppContext, telegram};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::parse();
    tracing::info!(?config, "starting");

    let ctx = AppContext::new(config);
    let scratch_root = ctx.scratch_root();
    std::fs::create_dir_all(&scratch_root)
        .with_context(|| format!("cannot create scratch root {}", scratch_root.display()))?;

    telegram::run(Arc::new(ctx)).await;
    Ok(())
}
