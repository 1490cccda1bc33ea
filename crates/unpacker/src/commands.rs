//! Bot commands and the table that maps each one to its handler.

use crate::AppContext;

pub const GREETING: &str = "Hi! Send me an archive and I will unpack it.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
}

/// Produces the reply text for a command.
pub type CommandHandler = fn(&AppContext) -> String;

pub struct CommandSpec {
    pub command: Command,
    /// Name without the leading slash.
    pub name: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}

pub const COMMANDS: &[CommandSpec] = &[CommandSpec {
    command: Command::Start,
    name: "start",
    description: "Show the greeting",
    handler: start,
}];

fn start(_ctx: &AppContext) -> String {
    GREETING.to_owned()
}

impl Command {
    /// Parse a message text such as `/start` or `/start@my_bot arg`.
    ///
    /// When `bot_name` is given, commands addressed to another bot are
    /// ignored.
    pub fn parse(text: &str, bot_name: Option<&str>) -> Option<Self> {
        let token = text.split_whitespace().next()?.strip_prefix('/')?;
        let (name, addressee) = match token.split_once('@') {
            Some((name, addressee)) => (name, Some(addressee)),
            None => (token, None),
        };

        if let (Some(addressee), Some(bot_name)) = (addressee, bot_name) {
            if !addressee.eq_ignore_ascii_case(bot_name) {
                return None;
            }
        }

        COMMANDS
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.command)
    }
}

/// Reply for a command message, or `None` when `text` is not a known command.
pub fn dispatch(ctx: &AppContext, text: &str, bot_name: Option<&str>) -> Option<String> {
    let command = Command::parse(text, bot_name)?;
    let entry = COMMANDS.iter().find(|entry| entry.command == command)?;
    tracing::info!(?command, "handling command");
    Some((entry.handler)(ctx))
}
