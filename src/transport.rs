//! HTTP transport with a single direct-address fallback retry.
//!
//! Every outbound call is attempted once over the default client. If that
//! attempt fails at the transport level (timeout, DNS, connection error), the
//! call is retried exactly once through a fallback client that resolves the
//! hostname up front via a pluggable [`Resolve`] strategy and connects to the
//! resolved address directly, keeping the original hostname for TLS identity
//! verification and the Host header. A fallback failure is terminal for the
//! call.

use crate::errors::AppError;
use reqwest::Method;
use serde_json::Value;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use url::Url;

/// Timeout for lightweight read-only probe calls.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(15);
/// Timeout for message posts.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(25);

/// Hostname resolution strategy used by the fallback path.
pub trait Resolve: Send + Sync {
    /// Resolves `host` to a single address for a direct connection.
    fn resolve(&self, host: &str) -> impl Future<Output = Result<IpAddr, AppError>> + Send;
}

/// Default resolver: tokio DNS lookup, preferring IPv4.
///
/// Some serving environments time out over IPv6 on the first connection to
/// the messaging API's edge network, so A records win over AAAA here.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsResolver;

impl Resolve for DnsResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr, AppError> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| AppError::Transport(format!("DNS lookup failed for {}: {}", host, e)))?
            .collect();

        addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .map(|a| a.ip())
            .ok_or_else(|| {
                AppError::Transport(format!("DNS lookup returned no address for {}", host))
            })
    }
}

/// Outcome of a transport call that reached the remote peer.
///
/// Non-2xx statuses are not transport failures; callers decide what a given
/// status means for their protocol step.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: reqwest::StatusCode,
    pub body: String,
}

/// HTTP client pair implementing the default-then-fallback retry policy.
#[derive(Clone)]
pub struct FallbackTransport<R: Resolve = DnsResolver> {
    client: reqwest::Client,
    resolver: R,
}

impl FallbackTransport<DnsResolver> {
    /// Creates a transport with the default DNS resolution strategy.
    pub fn new() -> Result<Self, AppError> {
        Self::with_resolver(DnsResolver)
    }
}

impl<R: Resolve> FallbackTransport<R> {
    /// Creates a transport with a custom resolution strategy.
    pub fn with_resolver(resolver: R) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, resolver })
    }

    /// GET returning the raw response body.
    pub async fn get_text(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<TransportReply, AppError> {
        self.request(Method::GET, url, None, timeout).await
    }

    /// POST with a JSON body, returning status and raw response body.
    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<TransportReply, AppError> {
        self.request(Method::POST, url, Some(body), timeout).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<TransportReply, AppError> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::Transport(format!("invalid url: {}", e)))?;

        match execute(&self.client, method.clone(), url, body, timeout).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                // The URL path carries the bot credential; strip the URL
                // from the error and log only the endpoint name.
                let err = err.without_url();
                tracing::warn!(
                    "⚠️  Default transport failed for {} {}/{}: {}; retrying via direct address",
                    method,
                    parsed.host_str().unwrap_or("<no host>"),
                    endpoint_name(&parsed),
                    err
                );
                self.fallback(method, &parsed, url, body, timeout).await
            }
        }
    }

    /// Single fallback attempt: resolve the host ourselves and connect to the
    /// address directly. The URL keeps the original hostname, so TLS SNI and
    /// the Host header are unchanged. Not retried again on failure.
    async fn fallback(
        &self,
        method: Method,
        parsed: &Url,
        url: &str,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<TransportReply, AppError> {
        let host = parsed
            .host_str()
            .ok_or_else(|| AppError::Transport("url has no host".to_string()))?;

        let ip = self.resolver.resolve(host).await?;
        tracing::debug!("Fallback resolution: {} -> {}", host, ip);

        // Port 0 keeps the URL's port; only the address is overridden.
        let client = reqwest::Client::builder()
            .resolve(host, SocketAddr::new(ip, 0))
            .build()
            .map_err(|e| {
                AppError::Transport(format!("Failed to create fallback client: {}", e))
            })?;

        let reply = execute(&client, method, url, body, timeout)
            .await
            .map_err(|e| {
                AppError::Transport(format!("fallback via {} failed: {}", ip, e.without_url()))
            })?;

        tracing::info!("✓ Fallback delivery via {} succeeded", ip);
        Ok(reply)
    }
}

async fn execute(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    body: Option<&Value>,
    timeout: Duration,
) -> Result<TransportReply, reqwest::Error> {
    let mut request = client.request(method, url).timeout(timeout);
    if let Some(json) = body {
        request = request.json(json);
    }

    let response = request.send().await?;
    let status = response.status();
    // An unreadable body is reported as empty rather than failing the call.
    let body = response.text().await.unwrap_or_default();

    Ok(TransportReply { status, body })
}

fn endpoint_name(url: &Url) -> &str {
    url.path().rsplit('/').next().unwrap_or_default()
}

/// Truncates a string to at most `max_chars` characters for log output,
/// respecting UTF-8 boundaries.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_creation() {
        let transport = FallbackTransport::new();
        assert!(transport.is_ok());
    }

    #[test]
    fn truncation_respects_utf8_boundaries() {
        assert_eq!(truncate_chars("가나다라", 2), "가나");
        assert_eq!(truncate_chars("short", 200), "short");
    }
}
