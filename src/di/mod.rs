mod container;

pub use container::{ServiceContainer, TelegramWatchlistPresenter};
