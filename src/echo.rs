//! Echo bot: repeats every text message back to its chat.

use courier_api::{Bot, UpdatePoller};
use courier_core::{config::PollingConfig, types::Update};
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn run(bot: Bot, polling: PollingConfig) -> anyhow::Result<()> {
    let bot = Arc::new(bot);
    let me = bot.get_me().await?;
    info!(
        "echo bot @{} ready",
        me.username.as_deref().unwrap_or(&me.first_name)
    );

    let allowed = polling.allowed_updates.clone();
    let poller = UpdatePoller::new(Arc::clone(&bot), polling);
    let mut updates = poller.start(allowed)?;

    loop {
        tokio::select! {
            next = updates.recv() => match next {
                Some(update) => reply(&bot, &update).await,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, stopping poller");
                poller.stop();
                break;
            }
        }
    }

    if let Err(e) = poller.wait().await {
        error!("update poller faulted: {e}");
        anyhow::bail!("another instance is polling this bot: {e}");
    }
    info!(offset = poller.offset(), "echo bot stopped");
    Ok(())
}

async fn reply(bot: &Bot, update: &Update) {
    let Some(message) = update.message() else {
        return;
    };
    let Some(text) = message.text.as_deref() else {
        return;
    };

    if let Err(e) = bot.send_message(message.chat.id, text, None).await {
        warn!(
            update_id = update.update_id,
            chat_id = message.chat.id,
            "echo reply failed: {e}"
        );
    }
}
