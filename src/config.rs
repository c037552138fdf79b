use serde::Deserialize;

/// Default Telegram Bot API origin. Overridable via `TELEGRAM_API_BASE`,
/// mainly so tests can point the client at a local mock server.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub telegram_bot_token: String,
    /// Ordered recipient chat ids. The first entry is the primary (warm-up)
    /// target; the rest receive the fan-out.
    pub telegram_chat_ids: Vec<String>,
    pub telegram_api_base: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN environment variable required"))
                .and_then(|token| {
                    if token.trim().is_empty() {
                        anyhow::bail!("TELEGRAM_BOT_TOKEN cannot be empty");
                    }
                    Ok(token)
                })?,
            telegram_chat_ids: std::env::var("TELEGRAM_CHAT_IDS")
                .map_err(|_| anyhow::anyhow!("TELEGRAM_CHAT_IDS environment variable required"))
                .and_then(|ids| {
                    let ids = Self::parse_chat_ids(&ids);
                    if ids.is_empty() {
                        anyhow::bail!("TELEGRAM_CHAT_IDS must contain at least one chat id");
                    }
                    Ok(ids)
                })?,
            telegram_api_base: std::env::var("TELEGRAM_API_BASE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
        };

        if !config.telegram_api_base.starts_with("http://")
            && !config.telegram_api_base.starts_with("https://")
        {
            anyhow::bail!("TELEGRAM_API_BASE must start with http:// or https://");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Telegram API base: {}", config.telegram_api_base);
        tracing::debug!(
            "Recipient chat ids configured: {}",
            config.telegram_chat_ids.len()
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Splits the comma-separated recipient list, trimming entries and
    /// dropping blanks.
    pub fn parse_chat_ids(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}
