use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use crate::commands::MyDialogue;
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::presenter::watchlist_presenter::WatchlistPresenter;

/// Button actions carried in callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    ShowWatchlist,
    Refresh,
    PromptAdd,
    View(String),
    Remove(String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "watchlist" => Some(CallbackAction::ShowWatchlist),
            "watchlist_refresh" => Some(CallbackAction::Refresh),
            "watchlist_add" => Some(CallbackAction::PromptAdd),
            _ => {
                if let Some(symbol) = data.strip_prefix("watchlist_view_") {
                    Some(CallbackAction::View(symbol.to_string()))
                } else if let Some(symbol) = data.strip_prefix("watchlist_remove_") {
                    Some(CallbackAction::Remove(symbol.to_string()))
                } else {
                    None
                }
            }
        }
    }
}

// Main callback handler function
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    // Extract the callback data
    let callback_data = match q.data.clone() {
        Some(data) => data,
        None => return Ok(()),
    };

    // Get the chat ID
    let chat_id = match q.message {
        Some(ref msg) => msg.chat().id,
        None => return Ok(()),
    };

    info!("Received callback: {} in chat {}", callback_data, chat_id);

    // Acknowledge the callback query to stop loading animation
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        info!("Failed to answer callback query: {}", err);
    }

    let action = match CallbackAction::parse(&callback_data) {
        Some(action) => action,
        None => {
            warn!("Unknown callback data: {}", callback_data);
            return Ok(());
        }
    };

    let presenter = services.watchlist_presenter(bot, chat_id);

    match action {
        CallbackAction::ShowWatchlist => presenter.show_watchlist().await,
        CallbackAction::Refresh => presenter.refresh_watchlist().await,
        CallbackAction::PromptAdd => {
            dialogue.update(State::AwaitingSymbol).await?;
            presenter.prompt_for_symbol().await
        }
        CallbackAction::View(symbol) => presenter.show_entry_detail(&symbol).await,
        CallbackAction::Remove(symbol) => presenter.remove_symbol(&symbol).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_callbacks() {
        assert_eq!(
            CallbackAction::parse("watchlist"),
            Some(CallbackAction::ShowWatchlist)
        );
        assert_eq!(
            CallbackAction::parse("watchlist_refresh"),
            Some(CallbackAction::Refresh)
        );
        assert_eq!(
            CallbackAction::parse("watchlist_add"),
            Some(CallbackAction::PromptAdd)
        );
        assert_eq!(
            CallbackAction::parse("watchlist_remove_NGPL"),
            Some(CallbackAction::Remove("NGPL".to_string()))
        );
        assert_eq!(
            CallbackAction::parse("watchlist_view_HRL"),
            Some(CallbackAction::View("HRL".to_string()))
        );
    }

    #[test]
    fn ignores_unknown_callbacks() {
        assert_eq!(CallbackAction::parse("menu"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }
}
