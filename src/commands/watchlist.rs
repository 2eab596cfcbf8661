use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::presenter::watchlist_presenter::WatchlistPresenter;

pub struct WatchlistCommand;

impl CommandHandler for WatchlistCommand {
    async fn execute(
        bot: Bot,
        msg: Message,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let presenter = services.watchlist_presenter(bot, msg.chat.id);
        presenter.show_watchlist().await
    }
}

pub struct RefreshCommand;

impl CommandHandler for RefreshCommand {
    async fn execute(
        bot: Bot,
        msg: Message,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Refresh requested from chat {}", msg.chat.id);

        let presenter = services.watchlist_presenter(bot, msg.chat.id);
        presenter.refresh_watchlist().await
    }
}

// /add with a symbol adds it right away, without one it asks for the symbol
pub async fn add_symbol(
    bot: Bot,
    msg: Message,
    symbol: String,
    dialogue: Option<MyDialogue>,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let presenter = services.watchlist_presenter(bot, msg.chat.id);

    if symbol.trim().is_empty() {
        if let Some(dialogue) = dialogue {
            dialogue.update(State::AwaitingSymbol).await?;
        }
        return presenter.prompt_for_symbol().await;
    }

    presenter.add_symbol(&symbol).await
}

pub async fn remove_symbol(
    bot: Bot,
    msg: Message,
    symbol: String,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let chat_id = msg.chat.id;

    if symbol.trim().is_empty() {
        bot.send_message(
            chat_id,
            "Use the command in this format: /remove <symbol>\n\nExample: /remove NGPL",
        )
        .await?;
        return Ok(());
    }

    let presenter = services.watchlist_presenter(bot, chat_id);
    presenter.remove_symbol(&symbol).await
}

// Handler for symbol input after the "Add Stock" prompt
pub async fn receive_symbol(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let chat_id = msg.chat.id;

    // Reset dialogue state
    dialogue.update(State::Start).await?;

    if let Some(symbol) = msg.text() {
        let presenter = services.watchlist_presenter(bot, chat_id);
        presenter.add_symbol(symbol).await?;
    } else {
        bot.send_message(chat_id, "Please enter a stock symbol, e.g. NGPL.")
            .await?;
    }

    Ok(())
}
