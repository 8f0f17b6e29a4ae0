//! Message handlers module
//!
//! Feeds plain text messages into the user's skill conversation

use teloxide::{Bot, prelude::*};
use tracing::debug;
use crate::models::Message;
use crate::state::SessionRegistry;
use crate::utils::errors::{Result, SkillflowError};

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: teloxide::types::Message,
    sessions: &SessionRegistry,
    package: &str,
) -> Result<()> {
    let message = Message::from_telegram(&msg).ok_or_else(|| {
        SkillflowError::InvalidInput("No user in message".to_string())
    })?;

    if !msg.chat.id.is_user() {
        debug!(chat_id = ?msg.chat.id, "Ignoring message outside private chat");
        return Ok(());
    }

    if let Some(reply) = respond(sessions, package, &message).await? {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}

/// Drive the conversation by one message and pick the reply to send, if any
pub async fn respond(sessions: &SessionRegistry, package: &str, msg: &Message) -> Result<Option<String>> {
    let prompt = sessions.drive(package, msg).await?;

    debug!(pkg = package, user_id = msg.user.id, replied = !prompt.is_empty(), "Message processed");
    Ok(if prompt.is_empty() { None } else { Some(prompt) })
}
