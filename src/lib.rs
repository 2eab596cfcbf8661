pub mod commands;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod presenter;
pub mod router;
pub mod scraper;
pub mod settings;
pub mod storage;
pub mod utils;
pub mod view;

use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, Bot};

// Re-export commonly used items
pub use commands::*;
pub use di::*;
pub use entity::*;
pub use router::*;
pub use settings::Settings;
pub use utils::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire the router and the dialogue storage around an already built service container
pub fn create_application(
    bot: Bot,
    services: ServiceContainer,
) -> (
    TelegramRouter,
    Bot,
    Arc<ServiceContainer>,
    Arc<InMemStorage<State>>,
) {
    let router = TelegramRouter::new();
    let storage = InMemStorage::<State>::new();

    (router, bot, Arc::new(services), storage)
}
