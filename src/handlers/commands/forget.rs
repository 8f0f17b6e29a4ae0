//! Forget command handler
//!
//! Drops everything the user has stored for the active skill

use teloxide::{Bot, types::Message, prelude::*};
use tracing::info;
use crate::models;
use crate::state::SessionRegistry;
use crate::utils::errors::{Result, SkillflowError};

/// Handle /forget command
pub async fn handle_forget(
    bot: Bot,
    msg: Message,
    sessions: &SessionRegistry,
    package: &str,
) -> Result<()> {
    let message = models::Message::from_telegram(&msg).ok_or_else(|| {
        SkillflowError::InvalidInput("No user in message".to_string())
    })?;

    sessions.forget(package, &message).await;
    info!(pkg = package, user_id = message.user.id, "User memory cleared");

    bot.send_message(msg.chat.id, "Done, I've forgotten your answers. Send /start to begin again.").await?;
    Ok(())
}
