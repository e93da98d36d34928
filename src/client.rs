// src/client.rs
use reqwest::{header::ACCEPT, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::models::{ApiEnvelope, TokenBalance, UpstreamTransfer};
use crate::networks::Network;
use crate::retry::RetryPolicy;

/// Authenticated GET access to the token API.
#[derive(Debug, Clone)]
pub struct TokenApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl TokenApiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = Client::builder().timeout(cfg.request_timeout).build()?;

        Ok(Self {
            http,
            base_url: cfg.token_api_url.trim_end_matches('/').to_string(),
            token: cfg.api_token.clone(),
            retry: cfg.retry,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.token.is_some()
    }

    /// GET `path` with retries. Non-2xx responses become `UpstreamHttp`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.retry.run(path, || self.get_once(path, query)).await
    }

    async fn get_once<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self.token.as_deref().ok_or(DashboardError::MissingCredential)?;
        let url = format!("{}{}", self.base_url, path);

        debug!("📡 GET {} {:?}", url, query);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(DashboardError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        debug!("📩 {} → {} bytes", url, body.len());
        Ok(serde_json::from_str(&body)?)
    }

    /// All token holdings of `address` on `network`.
    pub async fn balances(&self, address: &str, network: Network) -> Result<Vec<TokenBalance>> {
        let path = format!("/balances/evm/{}", address);
        let env: ApiEnvelope<TokenBalance> = self
            .get(&path, &[("network_id", network.api_id().to_string())])
            .await?;
        Ok(env.data)
    }

    /// Most recent transfers touching `address` on `network`.
    pub async fn transfers(
        &self,
        address: &str,
        network: Network,
        limit: u32,
    ) -> Result<Vec<UpstreamTransfer>> {
        let path = format!("/transfers/evm/{}", address);
        let env: ApiEnvelope<UpstreamTransfer> = self
            .get(
                &path,
                &[
                    ("network_id", network.api_id().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(env.data)
    }
}
