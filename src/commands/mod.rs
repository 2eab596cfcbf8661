use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*};

use crate::di::ServiceContainer;
use crate::entity::State;
use teloxide::dispatching::dialogue::Dialogue;

pub mod callback;
pub mod help;
pub mod start;
pub mod watchlist;

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

/// Trait that defines a command handler
pub trait CommandHandler {
    /// Execute the command
    async fn execute(
        bot: Bot,
        msg: Message,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()>;
}

/// Bot commands for teloxide command filter
#[derive(teloxide::utils::command::BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start the bot and show your watchlist")]
    Start,
    #[command(description = "show your stock watchlist")]
    Watchlist,
    #[command(description = "add a stock symbol, e.g. /add NGPL")]
    Add(String),
    #[command(description = "remove a stock symbol, e.g. /remove NGPL")]
    Remove(String),
    #[command(description = "fetch the latest prices for every stock")]
    Refresh,
    #[command(description = "display this help message")]
    Help,
}

/// Route a parsed command to its handler
pub async fn dispatch_command(
    bot: Bot,
    msg: Message,
    command: Command,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    info!("Command {:?} received in chat {}", command, msg.chat.id);

    // A command always cancels a pending symbol prompt
    dialogue.update(State::Start).await?;

    let dialogue = Some(dialogue);
    match command {
        Command::Start => start::StartCommand::execute(bot, msg, dialogue, services).await,
        Command::Watchlist => {
            watchlist::WatchlistCommand::execute(bot, msg, dialogue, services).await
        }
        Command::Add(symbol) => {
            watchlist::add_symbol(bot, msg, symbol, dialogue, services).await
        }
        Command::Remove(symbol) => watchlist::remove_symbol(bot, msg, symbol, services).await,
        Command::Refresh => {
            watchlist::RefreshCommand::execute(bot, msg, dialogue, services).await
        }
        Command::Help => help::HelpCommand::execute(bot, msg, dialogue, services).await,
    }
}
