use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::transport::{
    truncate_chars, FallbackTransport, Resolve, TransportReply, PROBE_TIMEOUT, SEND_TIMEOUT,
};
use serde_json::json;

/// Client for the Telegram Bot API.
///
/// All calls go through the [`FallbackTransport`], so each one gets the
/// default-then-direct-address retry behavior.
#[derive(Clone)]
pub struct TelegramClient<R: Resolve = crate::transport::DnsResolver> {
    transport: FallbackTransport<R>,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Creates a client with the default transport.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self::with_transport(config, FallbackTransport::new()?))
    }
}

impl<R: Resolve> TelegramClient<R> {
    /// Creates a client over a caller-supplied transport.
    pub fn with_transport(config: &Config, transport: FallbackTransport<R>) -> Self {
        Self {
            transport,
            base_url: config.telegram_api_base.trim_end_matches('/').to_string(),
            token: config.telegram_bot_token.clone(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Connectivity probe: read-only `getMe` call.
    ///
    /// Succeeds only when the response body carries the Bot API success
    /// marker; anything else is a probe failure and the caller must not send.
    pub async fn get_me(&self) -> Result<(), AppError> {
        let reply = self
            .transport
            .get_text(&self.method_url("getMe"), PROBE_TIMEOUT)
            .await
            .context("getMe probe")?;

        tracing::info!("[TG probe getMe] {}", truncate_chars(&reply.body, 200));

        if reply.body.starts_with("{\"ok\":true") {
            Ok(())
        } else {
            Err(AppError::ProbeFailure(
                truncate_chars(&reply.body, 200).to_string(),
            ))
        }
    }

    /// Sends the message to a single chat.
    ///
    /// Returns the transport reply; a non-200 status is reported to the
    /// caller rather than mapped to an error here, since what it means
    /// depends on the delivery phase (warm-up vs fan-out).
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
    ) -> Result<TransportReply, AppError> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        self.transport
            .post_json(&self.method_url("sendMessage"), &body, SEND_TIMEOUT)
            .await
    }
}
