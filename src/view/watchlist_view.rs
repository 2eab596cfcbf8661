use crate::entity::WatchlistEntry;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use log::debug;
use teloxide::{
    prelude::*,
    types::{ChatAction, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode},
    utils::html,
    Bot,
};
use tokio::sync::Mutex;

pub const DATA_SOURCE: &str = "merolagani.com";

#[async_trait]
pub trait WatchlistView: Send + Sync {
    async fn display_watchlist(&self, watchlist: Vec<WatchlistEntry>) -> Result<()>;
    async fn display_entry_detail(&self, entry: WatchlistEntry) -> Result<()>;
    async fn display_empty_watchlist(&self) -> Result<()>;
    async fn prompt_for_symbol(&self) -> Result<()>;
    async fn display_symbol_added(&self, symbol: &str) -> Result<()>;
    async fn display_already_tracked(&self, symbol: &str) -> Result<()>;
    async fn display_invalid_symbol(&self, input: &str) -> Result<()>;
    async fn display_symbol_removed(&self, symbol: &str) -> Result<()>;
    async fn display_symbol_not_found(&self, symbol: &str) -> Result<()>;
    async fn display_refresh_started(&self, total: usize) -> Result<()>;
    async fn display_refresh_progress(&self, done: usize, total: usize) -> Result<()>;
    async fn display_warning(&self, message: String) -> Result<()>;
    async fn display_refresh_finished(&self, updated: usize) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

/// Watchlist rendered as an HTML message body.
pub fn format_watchlist(watchlist: &[WatchlistEntry]) -> String {
    let mut text = String::from("<b>📈 Your Stock Watchlist</b>\n\n");

    for entry in watchlist {
        text.push_str(&format!(
            "{} <b>{}</b>  {}  ({})\n<i>Last updated: {}</i>\n",
            entry.change_direction().marker(),
            html::escape(&entry.symbol),
            html::escape(&entry.last_price),
            html::escape(&entry.price_change),
            entry.format_last_updated(),
        ));
    }

    text.push_str(&format!(
        "\n<i>Data source: {} | Last refresh attempt: {}</i>",
        DATA_SOURCE,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    text
}

pub fn watchlist_keyboard(watchlist: &[WatchlistEntry]) -> InlineKeyboardMarkup {
    let mut keyboard_buttons = vec![];

    for entry in watchlist {
        keyboard_buttons.push(vec![
            InlineKeyboardButton::callback(
                format!("{}: {}", entry.symbol, entry.last_price),
                format!("watchlist_view_{}", entry.symbol),
            ),
            InlineKeyboardButton::callback("❌", format!("watchlist_remove_{}", entry.symbol)),
        ]);
    }

    keyboard_buttons.push(vec![
        InlineKeyboardButton::callback("➕ Add Stock", "watchlist_add"),
        InlineKeyboardButton::callback("🔄 Refresh Prices", "watchlist_refresh"),
    ]);

    InlineKeyboardMarkup::new(keyboard_buttons)
}

pub struct TelegramWatchlistView {
    bot: Bot,
    chat_id: ChatId,
    progress_message_id: Mutex<Option<MessageId>>,
}

impl TelegramWatchlistView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self {
            bot,
            chat_id,
            progress_message_id: Mutex::new(None),
        }
    }

    // Edit the progress message if there is one, otherwise send a new message
    async fn update_progress_message(&self, text: String) -> Result<()> {
        let message_id = *self.progress_message_id.lock().await;

        match message_id {
            Some(message_id) => {
                if let Err(e) = self
                    .bot
                    .edit_message_text(self.chat_id, message_id, text)
                    .await
                {
                    debug!("Failed to edit progress message: {}", e);
                }
            }
            None => {
                self.bot.send_message(self.chat_id, text).await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl WatchlistView for TelegramWatchlistView {
    async fn display_watchlist(&self, watchlist: Vec<WatchlistEntry>) -> Result<()> {
        if watchlist.is_empty() {
            return self.display_empty_watchlist().await;
        }

        self.bot
            .send_message(self.chat_id, format_watchlist(&watchlist))
            .parse_mode(ParseMode::Html)
            .reply_markup(watchlist_keyboard(&watchlist))
            .await?;

        Ok(())
    }

    async fn display_entry_detail(&self, entry: WatchlistEntry) -> Result<()> {
        let keyboard = InlineKeyboardMarkup::new(vec![
            vec![InlineKeyboardButton::callback(
                "🗑️ Remove from Watchlist",
                format!("watchlist_remove_{}", entry.symbol),
            )],
            vec![InlineKeyboardButton::callback(
                "← Back to Watchlist",
                "watchlist",
            )],
        ]);

        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "<b>{}</b>\n\n\
                    • Last Price: <b>{}</b>\n\
                    • Price Change: {} {}\n\
                    • Last Updated: {}",
                    html::escape(&entry.symbol),
                    html::escape(&entry.last_price),
                    entry.change_direction().marker(),
                    html::escape(&entry.price_change),
                    entry.format_last_updated()
                ),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await?;

        Ok(())
    }

    async fn display_empty_watchlist(&self) -> Result<()> {
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "➕ Add First Stock",
            "watchlist_add",
        )]]);

        self.bot
            .send_message(
                self.chat_id,
                "Your watchlist is empty. Add stocks with /add SYMBOL.\n\
                Example stock symbols: NGPL, RADHI, HRL, etc.",
            )
            .reply_markup(keyboard)
            .await?;

        Ok(())
    }

    async fn prompt_for_symbol(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Please enter the stock symbol to add:")
            .await?;

        Ok(())
    }

    async fn display_symbol_added(&self, symbol: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!("✅ Added <b>{}</b> to your watchlist!", html::escape(symbol)),
            )
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_already_tracked(&self, symbol: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "⚠️ <b>{}</b> is already in your watchlist.",
                    html::escape(symbol)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_invalid_symbol(&self, input: &str) -> Result<()> {
        let keyboard = InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback("Try Again", "watchlist_add"),
            InlineKeyboardButton::callback("Cancel", "watchlist"),
        ]]);

        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "❌ Invalid stock symbol: {:?}\n\nPlease enter a symbol such as NGPL.",
                    input
                ),
            )
            .reply_markup(keyboard)
            .await?;

        Ok(())
    }

    async fn display_symbol_removed(&self, symbol: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "✅ Removed <b>{}</b> from your watchlist",
                    html::escape(symbol)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_symbol_not_found(&self, symbol: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "<b>{}</b> is not in your watchlist",
                    html::escape(symbol)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_refresh_started(&self, total: usize) -> Result<()> {
        let message = self
            .bot
            .send_message(
                self.chat_id,
                format!(
                    "Fetching stock prices for {} symbols... This may take a moment.",
                    total
                ),
            )
            .await?;

        *self.progress_message_id.lock().await = Some(message.id);
        Ok(())
    }

    async fn display_refresh_progress(&self, done: usize, total: usize) -> Result<()> {
        if let Err(e) = self
            .bot
            .send_chat_action(self.chat_id, ChatAction::Typing)
            .await
        {
            debug!("Failed to send chat action: {}", e);
        }

        self.update_progress_message(format!("Fetching stock prices... {}/{}", done, total))
            .await
    }

    async fn display_warning(&self, message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("⚠️ {}", message))
            .await?;

        Ok(())
    }

    async fn display_refresh_finished(&self, updated: usize) -> Result<()> {
        self.update_progress_message(format!("✅ Updated prices for {} stocks!", updated))
            .await?;
        *self.progress_message_id.lock().await = None;
        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("❌ An error occurred: {}", error_message))
            .await?;

        Ok(())
    }
}
