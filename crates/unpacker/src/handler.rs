//! Per-document pipeline: save, classify, extract, relay.
//!
//! Every request gets its own [`ScratchDir`]; it is removed on every exit
//! path, including errors from the transport.

use std::path::Path;

use tracing::{info, warn};
use unpacker_archive::{Extract, Extractor, classify, collect_outputs};
use unpacker_fs::ScratchDir;

use crate::{AppContext, Conversation, HandlerError};

pub const NOT_AN_ARCHIVE: &str = "This is not an archive.";
pub const EXTRACTION_FAILED: &str = "Failed to extract the archive";
pub const EMPTY_ARCHIVE: &str = "The archive has no files to send.";
pub const DONE: &str = "Done ✅";

/// Name used when the sender did not declare a usable file name.
const FALLBACK_NAME: &str = "document";

/// How a request ended. Each variant corresponds to one final reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    NotArchive,
    Failed(String),
    Empty,
    Delivered(usize),
}

pub async fn handle_document<C>(ctx: &AppContext, conversation: &C) -> Result<Outcome, HandlerError>
where
    C: Conversation + ?Sized,
{
    let user = conversation.user_id();
    let declared = conversation
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_NAME);
    info!(?user, file = declared, "received document");

    let scratch = ScratchDir::new_in(ctx.scratch_root())?;
    let archive = scratch
        .child(declared)
        .or_else(|_| scratch.child(FALLBACK_NAME))?;

    conversation.save_document(&archive).await?;
    info!(path = %archive.display(), "document saved");

    let outcome = relay(ctx, conversation, &scratch, &archive).await?;
    info!(?user, ?outcome, "request finished");

    if let Err(e) = scratch.close() {
        warn!(error = %e, "failed to remove scratch directory");
    }
    Ok(outcome)
}

async fn relay<C>(
    ctx: &AppContext,
    conversation: &C,
    scratch: &ScratchDir,
    archive: &Path,
) -> Result<Outcome, HandlerError>
where
    C: Conversation + ?Sized,
{
    let kind = {
        let archive = archive.to_path_buf();
        tokio::task::spawn_blocking(move || classify(archive)).await?
    };

    let Some(extractor) = Extractor::for_kind(kind, ctx.extract_options()) else {
        info!(path = %archive.display(), "not an archive");
        conversation.reply(NOT_AN_ARCHIVE).await?;
        return Ok(Outcome::NotArchive);
    };

    let extracted = {
        let (archive, destination) = (archive.to_path_buf(), scratch.path().to_path_buf());
        tokio::task::spawn_blocking(move || extractor.extract(&archive, &destination)).await?
    };
    if let Err(e) = extracted {
        let reason = e.to_string();
        conversation
            .reply(&format!("{EXTRACTION_FAILED}: {reason}"))
            .await?;
        return Ok(Outcome::Failed(reason));
    }

    let mut sent = 0;
    for path in collect_outputs(scratch.path(), archive) {
        info!(path = %path.display(), "sending file");
        conversation.reply_document(&path).await?;
        sent += 1;
    }

    if sent == 0 {
        info!("archive has no files to send");
        conversation.reply(EMPTY_ARCHIVE).await?;
        return Ok(Outcome::Empty);
    }

    info!(count = sent, "files sent");
    conversation.reply(DONE).await?;
    Ok(Outcome::Delivered(sent))
}
