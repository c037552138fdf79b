use crate::config::Config;
use crate::errors::AppError;
use crate::message::render_lead_message;
use crate::models::{DispatchAck, LeadSubmission};
use crate::telegram::TelegramClient;
use crate::transport::{truncate_chars, DnsResolver, Resolve};
use reqwest::StatusCode;
use tokio::task::JoinSet;

/// The notification dispatcher: one linear pipeline per submission.
///
/// validate -> render -> probe -> primary delivery -> fan-out -> aggregate.
///
/// Delivery is an explicit two-phase protocol. The first configured recipient
/// is the warm-up: its send is confirmed synchronously before any fan-out
/// begins, so a cold or broken connection to the bot API fails the whole
/// request up front instead of failing half the fan-out. Fan-out deliveries
/// then run concurrently and independently; one recipient failing never
/// cancels or blocks the others.
#[derive(Clone)]
pub struct LeadDispatcher<R: Resolve = DnsResolver> {
    config: Config,
    telegram: TelegramClient<R>,
}

impl LeadDispatcher {
    /// Creates a dispatcher with the default transport stack.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let telegram = TelegramClient::new(config)?;
        Ok(Self::with_telegram(config, telegram))
    }
}

impl<R> LeadDispatcher<R>
where
    R: Resolve + Clone + Send + Sync + 'static,
{
    /// Creates a dispatcher over a caller-supplied Telegram client.
    pub fn with_telegram(config: &Config, telegram: TelegramClient<R>) -> Self {
        Self {
            config: config.clone(),
            telegram,
        }
    }

    /// Validates and delivers one lead submission.
    ///
    /// All failures come back as a structured [`AppError`]; no network call
    /// is made unless configuration and every field constraint check out.
    ///
    /// # Arguments
    ///
    /// * `payload` - The raw, untyped request body.
    ///
    /// # Returns
    ///
    /// * `Result<DispatchAck, AppError>` - Delivery count on success.
    pub async fn submit(&self, payload: serde_json::Value) -> Result<DispatchAck, AppError> {
        // Step 1: configuration must be present before anything else.
        if self.config.telegram_bot_token.trim().is_empty() {
            return Err(AppError::Config("bot token not configured".to_string()));
        }
        let Some((primary, rest)) = self.config.telegram_chat_ids.split_first() else {
            return Err(AppError::Config("no recipient chat ids configured".to_string()));
        };

        // Step 2: parse and validate, fail-fast. A body that does not even
        // parse into a submission is a validation failure, not a 500.
        let submission: LeadSubmission = serde_json::from_value(payload)
            .map_err(|e| AppError::Validation(format!("invalid submission: {}", e)))?;
        let lead = submission.validate()?;

        tracing::info!(
            "📨 New lead: amount={} region={}",
            lead.amount,
            lead.region
        );

        // Rendered once; every recipient gets the identical text.
        let text = render_lead_message(&lead);

        // Step 3: connectivity probe. No message is sent if the bot API is
        // unreachable or rejects the credential.
        self.telegram.get_me().await?;

        // Step 4: warm-up delivery to the primary recipient, confirmed
        // synchronously before fanning out.
        let warm = self
            .telegram
            .send_message(primary, &text)
            .await
            .map_err(|e| AppError::PrimaryDeliveryFailure(e.to_string()))?;
        tracing::info!(
            "TG warmup: {} {}",
            warm.status,
            truncate_chars(&warm.body, 200)
        );
        if warm.status != StatusCode::OK {
            return Err(AppError::PrimaryDeliveryFailure(format!(
                "{} {}",
                warm.status,
                truncate_chars(&warm.body, 200)
            )));
        }

        // Step 5: fan-out to the remaining recipients, each as its own task
        // so a timeout or failure in one never cancels the siblings.
        let mut tasks = JoinSet::new();
        for chat_id in rest {
            let telegram = self.telegram.clone();
            let text = text.clone();
            let chat_id = chat_id.clone();
            tasks.spawn(async move {
                let outcome = telegram.send_message(&chat_id, &text).await;
                (chat_id, outcome)
            });
        }

        // Step 6: aggregate every outcome, success or failure.
        let mut delivered = 1usize;
        let mut failed: Vec<String> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((chat_id, Ok(reply))) if reply.status == StatusCode::OK => {
                    tracing::debug!("✓ Delivered to {}", chat_id);
                    delivered += 1;
                }
                Ok((chat_id, Ok(reply))) => {
                    tracing::warn!(
                        "⚠️  Send to {} returned {}: {}",
                        chat_id,
                        reply.status,
                        truncate_chars(&reply.body, 200)
                    );
                    failed.push(chat_id);
                }
                Ok((chat_id, Err(e))) => {
                    tracing::warn!("⚠️  Send to {} failed: {}", chat_id, e);
                    failed.push(chat_id);
                }
                Err(e) => {
                    // A fan-out task itself aborted; its recipient is unknown
                    // at this point, which only the logs can tell apart.
                    tracing::error!("Fan-out task failed: {}", e);
                }
            }
        }

        if !failed.is_empty() {
            // Deterministic order for the response; completion order is not.
            failed.sort();
            return Err(AppError::PartialFanOut { failed });
        }

        tracing::info!("✅ Lead delivered to {} recipients", delivered);
        Ok(DispatchAck { delivered })
    }
}
