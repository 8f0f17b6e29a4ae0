//! Help command handler

use teloxide::{Bot, types::Message, prelude::*, utils::command::BotCommands};
use crate::utils::errors::Result;
use super::Command;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    let help_text = format!(
        "🤖 Skillflow Help\n\n{}\n\nJust reply to my questions; I'll remember your answers for next time.",
        Command::descriptions()
    );

    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}
