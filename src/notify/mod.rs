//! Telegram notification sink
//!
//! Renders alert events into chat messages and delivers them over the Bot
//! API. Runs in a disabled mode when no Telegram section is configured so
//! the rest of the monitor works without credentials.

use crate::error::{MonitorError, Result};
use crate::types::AlertEvent;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// Telegram notifier for alerts and operational messages
#[derive(Clone)]
pub struct Notifier {
    http: Client,
    bot_token: Option<String>,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
    parse_mode: String,
    disable_web_page_preview: bool,
}

impl Notifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: Client::new(),
            bot_token: Some(bot_token),
            chat_id,
        }
    }

    /// A notifier that drops every message
    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            bot_token: None,
            chat_id: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.bot_token.is_some()
    }

    /// Send raw HTML-formatted text
    pub async fn send(&self, text: &str) -> Result<()> {
        let Some(token) = &self.bot_token else {
            debug!("Notifier disabled, dropping message");
            return Ok(());
        };

        let url = format!("https://api.telegram.org/bot{}/sendMessage", token);
        let req = SendMessageRequest {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "HTML".to_string(),
            disable_web_page_preview: true,
        };

        let resp = self.http.post(&url).json(&req).send().await?;
        if !resp.status().is_success() {
            return Err(MonitorError::Notify(format!(
                "telegram returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    pub async fn alert(&self, event: &AlertEvent) -> Result<()> {
        self.send(&format_alert(event)).await
    }

    pub async fn startup(&self) -> Result<()> {
        self.send("🔍 <b>Insider monitor started</b>").await
    }

    pub async fn error(&self, context: &str, message: &str) -> Result<()> {
        self.send(&format!("⚠️ <b>{}</b>\n{}", escape(context), escape(message)))
            .await
    }
}

/// Render one alert as a Telegram HTML message
pub fn format_alert(event: &AlertEvent) -> String {
    let severity_icon = match event.severity {
        crate::types::Severity::Critical => "🚨",
        crate::types::Severity::High => "🔴",
        crate::types::Severity::Medium => "🟡",
    };

    let wallet_short = if event.wallet_address.len() > 10 {
        format!("{}…", &event.wallet_address[..10])
    } else {
        event.wallet_address.clone()
    };

    let mut text = format!(
        "{} <b>{} — insider score {}</b>\n\
         <a href=\"{}\">{}</a>\n\n\
         💰 ${:.0} on {}\n\
         👤 <code>{}</code>{}\n\
         🕐 {}\n",
        severity_icon,
        event.severity.label(),
        event.score,
        event.market.url(),
        escape(&event.market.question),
        event.size_usd,
        event.recommended_side,
        wallet_short,
        if event.is_first_trade {
            " (first trade)"
        } else {
            ""
        },
        event.trade_timestamp.format("%Y-%m-%d %H:%M UTC"),
    );

    if !event.reasons.is_empty() {
        text.push_str("\nSignals:\n");
        for reason in &event.reasons {
            text.push_str(&format!("• {}\n", escape(reason)));
        }
    }

    text
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
