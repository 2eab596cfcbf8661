use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{prelude::*, types::ParseMode};

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::presenter::watchlist_presenter::WatchlistPresenter;

pub struct StartCommand;

impl CommandHandler for StartCommand {
    async fn execute(
        bot: Bot,
        msg: Message,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;

        info!("Start command received in chat {}", chat_id);

        bot.send_message(
            chat_id,
            "<b>📈 Stock Price Tracker</b>\n\n\
            Keep a list of stock symbols and fetch their latest prices from merolagani.com.\n\
            Use /add SYMBOL to track a stock and /refresh to update prices.",
        )
        .parse_mode(ParseMode::Html)
        .await?;

        let presenter = services.watchlist_presenter(bot, chat_id);
        presenter.show_watchlist().await
    }
}
