use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};

use super::payload::Payload;

/// Sends one payload to the sink and reports the HTTP-style status code.
///
/// A returned `Err` is a transport-level failure. Response bodies are ignored.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: &Payload) -> Result<u16>;
}

/// POSTs the payload as a JSON object.
///
/// Idle connections are not pooled; each request owns its connection.
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("invalid sink endpoint '{}'", endpoint))?;
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: &Payload) -> Result<u16> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .context("request failed")?;
        Ok(response.status().as_u16())
    }
}
