//! Campaign API HTTP client
//!
//! Talks to the remote marketing API over HTTPS. The service is vague about
//! how it expects the key, so every request takes an [`AuthStyle`].

use campaignlens_common::{Campaign, Config, MailboxAccount};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Field wrapping the campaign list in a response object
pub const CAMPAIGNS_FIELD: &str = "campaigns";

/// Field wrapping the mailbox account list in a response object
pub const ACCOUNTS_FIELD: &str = "email_accounts";

/// How the API key is attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStyle {
    /// `?api_key=<key>`
    QueryParam,
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `X-API-Key: <key>`
    ApiKeyHeader,
}

impl AuthStyle {
    /// Order in which styles are probed on connect
    pub const PROBE_ORDER: [AuthStyle; 3] = [
        AuthStyle::QueryParam,
        AuthStyle::Bearer,
        AuthStyle::ApiKeyHeader,
    ];

    fn apply(self, request: RequestBuilder, key: &str) -> RequestBuilder {
        match self {
            AuthStyle::QueryParam => request.query(&[("api_key", key)]),
            AuthStyle::Bearer => request.bearer_auth(key),
            AuthStyle::ApiKeyHeader => request.header("X-API-Key", key),
        }
    }
}

impl std::fmt::Display for AuthStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthStyle::QueryParam => write!(f, "query_param"),
            AuthStyle::Bearer => write!(f, "bearer"),
            AuthStyle::ApiKeyHeader => write!(f, "api_key_header"),
        }
    }
}

/// Failure of a single request
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// HTTP client for the campaign and mailbox account resources
#[derive(Debug, Clone)]
pub struct CampaignClient {
    http: Client,
    campaigns_url: String,
    accounts_url: String,
}

impl CampaignClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> campaignlens_common::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()
            .map_err(|e| {
                campaignlens_common::Error::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            campaigns_url: config.campaigns_url(),
            accounts_url: config.accounts_url(),
        })
    }

    /// Single round trip against the campaign resource; success status only
    pub async fn probe(&self, key: &str, style: AuthStyle) -> Result<(), ClientError> {
        debug!(auth = %style, "Probing {}", self.campaigns_url);
        self.send(&self.campaigns_url, key, style).await.map(|_| ())
    }

    /// Fetch the campaign list
    pub async fn fetch_campaigns(
        &self,
        key: &str,
        style: AuthStyle,
    ) -> Result<Vec<Campaign>, ClientError> {
        self.fetch_list(&self.campaigns_url, CAMPAIGNS_FIELD, key, style)
            .await
    }

    /// Fetch the mailbox account list
    pub async fn fetch_accounts(
        &self,
        key: &str,
        style: AuthStyle,
    ) -> Result<Vec<MailboxAccount>, ClientError> {
        self.fetch_list(&self.accounts_url, ACCOUNTS_FIELD, key, style)
            .await
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        url: &str,
        field: &str,
        key: &str,
        style: AuthStyle,
    ) -> Result<Vec<T>, ClientError> {
        let response = self.send(url, key, style).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("invalid JSON from {}: {}", url, e)))?;

        decode_list(body, field)
    }

    async fn send(
        &self,
        url: &str,
        key: &str,
        style: AuthStyle,
    ) -> Result<reqwest::Response, ClientError> {
        let request = self
            .http
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        let response = style.apply(request, key).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        Ok(response)
    }
}

/// Extract a record list from either `{"<field>": [...]}` or a bare array.
///
/// Entries that are not JSON objects are skipped.
pub fn decode_list<T: DeserializeOwned>(body: Value, field: &str) -> Result<Vec<T>, ClientError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) => Vec::new(),
            Some(_) => {
                return Err(ClientError::Decode(format!(
                    "field '{}' is not a list",
                    field
                )))
            }
            None => {
                return Err(ClientError::Decode(format!(
                    "expected a list or an object with '{}'",
                    field
                )))
            }
        },
        _ => {
            return Err(ClientError::Decode(format!(
                "expected a list or an object with '{}'",
                field
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            warn!("Skipping non-object entry in '{}' list", field);
            continue;
        }
        match serde_json::from_value(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping undecodable entry in '{}' list: {}", field, e),
        }
    }

    Ok(records)
}
