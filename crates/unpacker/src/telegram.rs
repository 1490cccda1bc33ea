//! teloxide adapter: dispatcher setup and the [`Conversation`] over a
//! Telegram message.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, InputFile};
use tokio::io::AsyncWriteExt;

use crate::commands::{self, COMMANDS};
use crate::{AppContext, Conversation, HandlerError, handler};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub struct TelegramConversation {
    bot: Bot,
    message: Message,
}

impl TelegramConversation {
    pub fn new(bot: Bot, message: Message) -> Self {
        Self { bot, message }
    }
}

#[async_trait]
impl Conversation for TelegramConversation {
    fn user_id(&self) -> Option<u64> {
        self.message.from.as_ref().map(|user| user.id.0)
    }

    fn file_name(&self) -> Option<&str> {
        self.message
            .document()
            .and_then(|document| document.file_name.as_deref())
    }

    async fn save_document(&self, path: &Path) -> Result<(), HandlerError> {
        let document = self.message.document().ok_or(HandlerError::NoDocument)?;
        let file = self
            .bot
            .get_file(document.file.id.clone())
            .await
            .map_err(HandlerError::transport)?;

        let mut destination = tokio::fs::File::create(path).await?;
        self.bot
            .download_file(&file.path, &mut destination)
            .await
            .map_err(HandlerError::transport)?;
        destination.flush().await?;
        Ok(())
    }

    async fn reply(&self, text: &str) -> Result<(), HandlerError> {
        self.bot
            .send_message(self.message.chat.id, text)
            .await
            .map_err(HandlerError::transport)?;
        Ok(())
    }

    async fn reply_document(&self, path: &Path) -> Result<(), HandlerError> {
        self.bot
            .send_document(self.message.chat.id, InputFile::file(path.to_path_buf()))
            .await
            .map_err(HandlerError::transport)?;
        Ok(())
    }
}

/// Poll Telegram until interrupted.
pub async fn run(ctx: Arc<AppContext>) {
    let bot = Bot::new(ctx.token());

    let menu: Vec<BotCommand> = COMMANDS
        .iter()
        .map(|entry| BotCommand::new(entry.name, entry.description))
        .collect();
    if let Err(e) = bot.set_my_commands(menu).await {
        tracing::warn!(error = %e, "failed to register bot commands");
    }

    let bot_name = match bot.get_me().await {
        Ok(me) => me.user.username.clone(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch bot identity");
            None
        }
    };
    let bot_name = Arc::new(BotName(bot_name));

    let handler = Update::filter_message()
        .branch(dptree::filter(|msg: Message| msg.document().is_some()).endpoint(on_document))
        .branch(dptree::endpoint(on_text));

    tracing::info!("bot started");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx, bot_name])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

struct BotName(Option<String>);

async fn on_document(bot: Bot, msg: Message, ctx: Arc<AppContext>) -> HandlerResult {
    let conversation = TelegramConversation::new(bot, msg);
    if let Err(e) = handler::handle_document(&ctx, &conversation).await {
        tracing::error!(error = %e, "document request aborted");
        return Err(e.into());
    }
    Ok(())
}

async fn on_text(
    bot: Bot,
    msg: Message,
    ctx: Arc<AppContext>,
    bot_name: Arc<BotName>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if let Some(reply) = commands::dispatch(&ctx, text, bot_name.0.as_deref()) {
        let from = msg.from.as_ref().map(|user| user.id.0);
        tracing::info!(user = ?from, "answering command");
        bot.send_message(msg.chat.id, reply).await?;
    }
    Ok(())
}
