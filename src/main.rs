use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storekeeper::bot::{self, AppContext};
use storekeeper::config::BotConfig;
use storekeeper::db;
use storekeeper::session::{spawn_sweeper, EvictionPolicy};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let json = std::env::var("BOT_LOG_FORMAT")
        .is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting Storekeeper Telegram Bot");

    let config = BotConfig::from_env()?;
    if config.admins.is_empty() {
        warn!("ADMIN_CHAT_IDS is empty, every chat will only see the read-only menu");
    }

    // Create database pool and schema
    let pool = db::connect(&config.database_url).await?;
    db::init_database_schema(&pool).await?;
    let products = db::count_products(&pool).await?;
    info!(products, "Catalog ready");

    let ctx = AppContext::from_config(pool, &config);
    if let EvictionPolicy::IdleTimeout(timeout) = ctx.sessions.policy() {
        info!(timeout_secs = timeout.as_secs(), "Session eviction enabled");
        spawn_sweeper(Arc::clone(&ctx.sessions), SESSION_SWEEP_INTERVAL);
    }

    // Initialize the bot
    let bot = Bot::new(&config.telegram_token);
    let me = bot
        .get_me()
        .await
        .context("Failed to authorize with the Telegram Bot API")?;
    info!(
        username = %me.username(),
        admins = config.admins.len(),
        "Authorized, starting dispatcher"
    );

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
