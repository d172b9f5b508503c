//! Outbound client for fetching relay targets

use reqwest::{Client, Response};
use tokio::time::Duration;

use crate::config::RelayConfig;

#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    pub fn new(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        // Compressed bodies are decoded here; the caller never sees the
        // target's Content-Encoding, so it must receive plain bytes.
        let mut builder = Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60));

        if let Some(secs) = config.request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(agent) = config.user_agent.as_deref() {
            if !agent.is_empty() {
                builder = builder.user_agent(agent.to_string());
            }
        }

        let http_client = builder.build()?;
        Ok(Self { http_client })
    }

    /// Issue a GET to `url` and return once headers arrive; the body is left unread.
    pub async fn open(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.http_client.get(url).send().await
    }
}
