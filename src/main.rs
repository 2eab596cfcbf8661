//! Stock Watchlist Bot for Telegram - Main executable
//!
//! Keeps a list of stock symbols and, on request, scrapes the latest price
//! and change for each of them from merolagani.com with a headless browser.
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};
use std::env;
use stock_watchlist_bot::{Command, Router, ServiceContainer, Settings};
use teloxide::{dptree, prelude::*, utils::command::BotCommands, Bot};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!(
        "Starting Stock Watchlist Telegram Bot v{}",
        stock_watchlist_bot::VERSION
    );

    // Load and validate environment variables
    let bot_token = env::var("TELEGRAM_BOT_TOKEN")
        .context("TELEGRAM_BOT_TOKEN must be set in environment variables")?;

    let settings = Settings::from_env()?;

    // Create Telegram bot instance
    let bot = Bot::new(bot_token);

    info!("Initializing watchlist services...");
    let services = ServiceContainer::from_settings(&settings)
        .await
        .context("Failed to initialize services")?;

    let (router, bot, service_container, storage) =
        stock_watchlist_bot::create_application(bot, services);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    // Get the handler from the router
    let handler = router.setup_handlers();

    // Build dispatcher with dependency injections and control-C handling
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service_container, storage])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    info!("Bot stopped");
    Ok(())
}
