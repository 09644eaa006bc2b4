//! Remote store setup

use anyhow::{Context, Result};
use galleria_core::Config;
use galleria_storage::{RemoteStore, TelegramConfig, TelegramStore};
use std::sync::Arc;
use std::time::Duration;

/// Build the bot-backed store. Missing credentials are not fatal at startup:
/// the server still serves metadata, and routes that need the remote store
/// answer with a configuration error.
pub fn setup_remote(config: &Config) -> Result<Option<Arc<dyn RemoteStore>>> {
    let (Some(bot_token), Some(chat_id)) = (config.telegram_bot_token(), config.telegram_chat_id())
    else {
        tracing::warn!(
            "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set; uploads and downloads are disabled"
        );
        return Ok(None);
    };

    let store = TelegramStore::new(TelegramConfig {
        api_url: config.telegram_api_url().to_string(),
        bot_token: bot_token.to_string(),
        chat_id: chat_id.to_string(),
        timeout: Duration::from_secs(config.remote_timeout_secs()),
    })
    .context("Failed to build remote store client")?;

    tracing::info!(api_url = %config.telegram_api_url(), "Remote store configured");
    Ok(Some(Arc::new(store)))
}
