//! Telegram delivery for alerts

use async_trait::async_trait;
use signal_engine::error::NotifyError;
use signal_engine::notify::Notifier;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::Recipient;

/// Sends alerts through the Bot API `sendMessage` call
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    /// Create a notifier whose requests give up after `timeout`
    pub fn new(token: &str, chat_id: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Delivery(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            bot: Bot::with_client(token, client),
            recipient: parse_recipient(chat_id),
        })
    }
}

/// Numeric ids go to a chat; anything else is treated as a channel username.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if chat_id.starts_with('@') => Recipient::ChannelUsername(chat_id.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{}", chat_id)),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let sent = self
            .bot
            .send_message(self.recipient.clone(), message)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        tracing::info!("Telegram message {} sent to chat {}", sent.id.0, sent.chat.id.0);
        Ok(())
    }
}
