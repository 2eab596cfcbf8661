use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};

use super::{Command, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;

pub struct HelpCommand;

impl CommandHandler for HelpCommand {
    async fn execute(
        bot: Bot,
        msg: Message,
        _dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        bot.send_message(msg.chat.id, Command::descriptions().to_string())
            .await?;

        Ok(())
    }
}
