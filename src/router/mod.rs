use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::InMemStorage, dispatching::UpdateHandler, prelude::*,
};

use crate::commands::{self, callback::handle_callback, Command, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;

// Base router trait
pub trait Router: Send + Sync {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error>;
}

/// Routes commands, dialogue replies and button presses.
/// Expects `Arc<ServiceContainer>` and `Arc<InMemStorage<State>>` as dependencies.
#[derive(Default)]
pub struct TelegramRouter;

impl TelegramRouter {
    pub fn new() -> Self {
        Self
    }
}

impl Router for TelegramRouter {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;

        let command_handler = teloxide::filter_command::<Command, _>().endpoint(
            |bot: Bot,
             msg: Message,
             command: Command,
             dialogue: MyDialogue,
             services: Arc<ServiceContainer>| async move {
                commands::dispatch_command(bot, msg, command, dialogue, services).await
            },
        );

        let message_handler = Update::filter_message().branch(command_handler).branch(
            case![State::AwaitingSymbol].endpoint(
                |bot: Bot, msg: Message, dialogue: MyDialogue, services: Arc<ServiceContainer>| async move {
                    commands::watchlist::receive_symbol(bot, msg, dialogue, services).await
                },
            ),
        );

        // Add callback query handler for our buttons
        let callback_handler = Update::filter_callback_query().endpoint(
            |bot: Bot, q: CallbackQuery, dialogue: MyDialogue, services: Arc<ServiceContainer>| async move {
                handle_callback(bot, q, dialogue, services).await
            },
        );

        teloxide::dispatching::dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
            .branch(callback_handler)
    }
}
