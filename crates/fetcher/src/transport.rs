use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

/// One status query: where to send it, how to authorize it, and the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    pub endpoint: String,
    pub token: String,
    pub from_date: i64,
}

impl StatusRequest {
    /// Query parameters rendered for diagnostics. Never includes the token.
    pub fn params(&self) -> String {
        format!("from_date={}", self.from_date)
    }
}

/// Status code and undecoded body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Transport used by the status fetcher.
///
/// An `Err` means the exchange did not complete at all (DNS, connect, timeout).
/// Any response that did arrive, whatever its status, is an `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: &StatusRequest) -> anyhow::Result<RawResponse>;
}

/// `reqwest`-backed transport with a bounded per-request timeout.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &StatusRequest) -> anyhow::Result<RawResponse> {
        let resp = self
            .client
            .get(&request.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", request.token))
            .query(&[("from_date", request.from_date)])
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(RawResponse { status, body })
    }
}
