use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use imb_core::{config::Config, conversation::ImeiService, messaging::port::MessagingPort};

use crate::handlers;
use crate::TelegramMessenger;

/// Per-process dependencies handed to every update handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ImeiService>,
    pub messenger: Arc<dyn MessagingPort>,
}

/// Build the bot and dispatcher and poll until Ctrl-C.
pub async fn run_polling(cfg: Arc<Config>, service: Arc<ImeiService>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "imb started"),
        Err(e) => anyhow::bail!("telegram get_me failed: {e}"),
    }
    tracing::info!(provider = %cfg.imei_api_base_url, "lookup provider configured");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState {
        service,
        messenger,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("imb stopped");
    Ok(())
}
