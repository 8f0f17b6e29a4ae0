//! Start command handler
//!
//! Restarts the user's conversation and shows the first prompt

use teloxide::{Bot, types::Message, prelude::*};
use tracing::{debug, info};
use crate::models;
use crate::state::SessionRegistry;
use crate::utils::errors::{Result, SkillflowError};

/// Handle /start command
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    sessions: &SessionRegistry,
    package: &str,
) -> Result<()> {
    let message = models::Message::from_telegram(&msg).ok_or_else(|| {
        SkillflowError::InvalidInput("No user in message".to_string())
    })?;

    debug!(user_id = message.user.id, chat_id = ?msg.chat.id, "Processing /start command");

    if !msg.chat.id.is_user() {
        bot.send_message(msg.chat.id, "Please talk to me in a private chat.").await?;
        return Ok(());
    }

    sessions.reset(package, &message).await?;
    let prompt = sessions.drive(package, &message).await?;
    info!(pkg = package, user_id = message.user.id, "Conversation started");

    if !prompt.is_empty() {
        bot.send_message(msg.chat.id, prompt).await?;
    }
    Ok(())
}
