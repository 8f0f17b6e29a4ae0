//! Command handlers module
//!
//! This module contains handlers for bot commands like /start and /help

pub mod forget;
pub mod help;
pub mod start;

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::state::SessionRegistry;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Skillflow commands:")]
pub enum Command {
    #[command(description = "Start the conversation from the first question")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Forget everything you told me")]
    Forget,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    sessions: &SessionRegistry,
    package: &str,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, sessions, package).await,
        Command::Help => help::handle_help(bot, msg).await,
        Command::Forget => forget::handle_forget(bot, msg, sessions, package).await,
    }
}
