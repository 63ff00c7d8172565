//! Connector - establishes and refreshes the live dashboard session
//!
//! Connect probes the authentication styles in [`AuthStyle::PROBE_ORDER`]
//! until one is accepted, then retrieves campaigns and mailbox accounts.
//! Each step is awaited in turn. The state lock is never held across a
//! request, so readers keep rendering while a connect is in flight and a
//! second connect or refresh gets [`Error::Busy`].
//!
//! The network work runs on a spawned task, so a caller that goes away
//! mid-connect cannot leave the session stuck in an in-flight phase.

use std::sync::Arc;

use campaignlens_common::{Error, Result};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::aggregate;
use crate::baseline;
use crate::client::{AuthStyle, CampaignClient, ClientError};
use crate::session::{SessionPhase, SessionState};

/// Owns the session state and the HTTP client that feeds it
#[derive(Clone)]
pub struct Connector {
    client: CampaignClient,
    state: Arc<RwLock<SessionState>>,
}

impl Connector {
    /// Create a connector starting on the demo baseline
    pub fn new(client: CampaignClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Current state for rendering
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Connect with a user-supplied key
    pub async fn connect(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::EmptyCredential);
        }

        self.state.write().await.begin(SessionPhase::Connecting)?;
        info!("Connecting to campaign API");

        let this = self.clone();
        let key = key.to_string();
        self.join(tokio::spawn(async move { this.establish(&key).await }))
            .await
    }

    /// Pull campaigns and accounts with a known key and auth style
    pub async fn retrieve(&self, key: &str, style: AuthStyle) -> Result<()> {
        self.state.write().await.begin(SessionPhase::Retrieving)?;

        let this = self.clone();
        let key = key.trim().to_string();
        self.join(tokio::spawn(async move {
            this.retrieve_in_flight(&key, style).await
        }))
        .await
    }

    /// Re-fetch with the stored key; a no-op unless connected
    pub async fn refresh(&self) -> Result<()> {
        let (key, style) = {
            let mut state = self.state.write().await;
            if state.phase.is_busy() {
                return Err(Error::Busy);
            }
            let (Some(key), Some(style)) = (state.api_key.clone(), state.auth_style) else {
                return Ok(());
            };
            if !state.connected || key.is_empty() {
                return Ok(());
            }
            state.begin(SessionPhase::Retrieving)?;
            (key, style)
        };

        debug!("Refreshing campaign data");
        let this = self.clone();
        self.join(tokio::spawn(async move {
            this.retrieve_in_flight(&key, style).await
        }))
        .await
    }

    /// Drop the session and restore the demo baseline
    pub async fn disconnect(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if state.phase.is_busy() {
            return Err(Error::Busy);
        }
        state.reset();
        info!("Disconnected from campaign API");
        Ok(())
    }

    /// Clear the alert text
    pub async fn dismiss_error(&self) {
        self.state.write().await.error = None;
    }

    /// Wait for a detached session task.
    ///
    /// The task owns the in-flight phase and always settles it, even when the
    /// caller stops waiting. A task that panics leaves the phase for us to
    /// settle here.
    async fn join(&self, task: JoinHandle<Result<()>>) -> Result<()> {
        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!("Session task failed: {}", e);
                let message = "Internal error while contacting the campaign API".to_string();
                self.state.write().await.fail_retrieval(message.clone());
                Err(Error::Internal(message))
            }
        }
    }

    /// Probe the auth styles in order, then retrieve with the first accepted
    async fn establish(&self, key: &str) -> Result<()> {
        let mut last_error = String::new();
        for style in AuthStyle::PROBE_ORDER {
            match self.client.probe(key, style).await {
                Ok(()) => {
                    info!(auth = %style, "Campaign API accepted key");
                    return self.retrieve_in_flight(key, style).await;
                }
                Err(e) => {
                    debug!(auth = %style, error = %e, "Authentication style rejected");
                    last_error = e.to_string();
                }
            }
        }

        let message = format!(
            "Failed to connect with API key. Last error: {}. Please check your API key and try again.",
            last_error
        );
        warn!("All authentication styles rejected");
        self.state.write().await.fail_connect(message.clone());

        Err(Error::ConnectFailed(message))
    }

    /// Caller has already entered an in-flight phase
    async fn retrieve_in_flight(&self, key: &str, style: AuthStyle) -> Result<()> {
        self.state.write().await.phase = SessionPhase::Retrieving;

        let campaigns = match self.client.fetch_campaigns(key, style).await {
            Ok(campaigns) => campaigns,
            Err(e) => {
                let message = match e {
                    ClientError::Status { status, .. } => format!(
                        "Invalid API key or failed to connect to the campaign API ({})",
                        status
                    ),
                    other => other.to_string(),
                };
                warn!("Campaign retrieval failed: {}", message);
                self.state.write().await.fail_retrieval(message.clone());
                return Err(Error::Retrieval(message));
            }
        };

        let accounts = match self.client.fetch_accounts(key, style).await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("Failed to fetch mailbox accounts, using fallback set: {}", e);
                baseline::fallback_accounts()
            }
        };

        let view = aggregate::derive_view(&campaigns, &accounts);
        info!(
            campaigns = campaigns.len(),
            accounts = accounts.len(),
            "Campaign data retrieved"
        );
        self.state
            .write()
            .await
            .publish(key, style, campaigns, accounts, view);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DashboardView;
    use campaignlens_common::Config;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CAMPAIGNS: &str = "/api/v1/campaigns";
    const ACCOUNTS: &str = "/api/v1/email-accounts";

    fn connector_for(server: &MockServer) -> Connector {
        connector_with_timeout(server, 5)
    }

    fn connector_with_timeout(server: &MockServer, timeout_secs: u64) -> Connector {
        let mut config = Config::default();
        config.provider.base_url = server.uri();
        config.provider.timeout_secs = timeout_secs;
        Connector::new(CampaignClient::new(&config).unwrap())
    }

    async fn wait_until_settled(connector: &Connector) -> SessionState {
        for _ in 0..100 {
            let state = connector.snapshot().await;
            if !state.phase.is_busy() {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("session never left the in-flight phase");
    }

    fn campaign_body() -> serde_json::Value {
        json!({
            "campaigns": [
                {
                    "id": 1,
                    "name": "Launch",
                    "status": "ACTIVE",
                    "sent_count": 100,
                    "open_count": 25,
                    "click_count": 5,
                    "reply_count": 2,
                    "bounce_count": 3,
                    "created_at": "2024-02-10T12:00:00Z"
                }
            ]
        })
    }

    async fn mount_query_campaigns(server: &MockServer, key: &str) {
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .and(query_param("api_key", key))
            .respond_with(ResponseTemplate::new(200).set_body_json(campaign_body()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_empty_key_rejected_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let connector = connector_for(&server);
        assert!(matches!(
            connector.connect("   ").await,
            Err(Error::EmptyCredential)
        ));
        let state = connector.snapshot().await;
        assert_eq!(state.phase, SessionPhase::Idle);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_connect_with_query_param() {
        let server = MockServer::start().await;
        mount_query_campaigns(&server, "key-123").await;
        Mock::given(method("GET"))
            .and(path(ACCOUNTS))
            .and(query_param("api_key", "key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 11, "email": "live@company.com", "status": "active", "health_score": 99 }
            ])))
            .mount(&server)
            .await;

        let connector = connector_for(&server);
        connector.connect("  key-123 ").await.unwrap();

        let state = connector.snapshot().await;
        assert!(state.connected);
        assert!(!state.loading);
        assert_eq!(state.phase, SessionPhase::Connected);
        assert_eq!(state.auth_style, Some(AuthStyle::QueryParam));
        assert_eq!(state.error, None);
        assert_eq!(state.campaigns.len(), 1);
        assert_eq!(state.view.metrics.total_emails, 100);
        assert_eq!(state.view.metrics.open_rate, 25.0);
        assert_eq!(state.view.monthly_series[1].sent, 100);
        assert_eq!(state.accounts[0].email, "live@company.com");
        assert_eq!(state.view.account_summary.total, 1);
    }

    #[tokio::test]
    async fn test_all_styles_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(3)
            .mount(&server)
            .await;

        let connector = connector_for(&server);
        let err = connector.connect("bad-key").await.unwrap_err();
        assert!(matches!(err, Error::ConnectFailed(_)));

        let state = connector.snapshot().await;
        assert!(!state.connected);
        assert!(!state.loading);
        assert_eq!(state.phase, SessionPhase::Error);
        let message = state.error.clone().unwrap();
        assert!(message.contains("403: forbidden"), "{}", message);
        assert!(message.starts_with("Failed to connect with API key."));
        assert!(!state.has_credential());
        assert_eq!(state.view, DashboardView::baseline());
    }

    #[tokio::test]
    async fn test_bearer_style_is_reused_for_retrieval() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(campaign_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(ACCOUNTS))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "email_accounts": [{ "id": 5, "email": "bearer@company.com" }]
            })))
            .mount(&server)
            .await;

        let connector = connector_for(&server);
        connector.connect("tok").await.unwrap();

        let state = connector.snapshot().await;
        assert!(state.connected);
        assert_eq!(state.auth_style, Some(AuthStyle::Bearer));
        assert_eq!(state.accounts.len(), 1);
        assert_eq!(state.accounts[0].email, "bearer@company.com");
    }

    #[tokio::test]
    async fn test_api_key_header_style() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .and(header("X-API-Key", "hdr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let connector = connector_for(&server);
        connector.connect("hdr").await.unwrap();

        let state = connector.snapshot().await;
        assert_eq!(state.auth_style, Some(AuthStyle::ApiKeyHeader));
        assert!(state.view.recent_campaigns.is_empty());
        assert!(state.view.top_performers.is_empty());
        assert_eq!(state.view.metrics.total_emails, 0);
    }

    #[tokio::test]
    async fn test_account_failure_uses_fallback_set() {
        let server = MockServer::start().await;
        mount_query_campaigns(&server, "k").await;
        Mock::given(method("GET"))
            .and(path(ACCOUNTS))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .mount(&server)
            .await;

        let connector = connector_for(&server);
        connector.connect("k").await.unwrap();

        let state = connector.snapshot().await;
        assert!(state.connected);
        assert_eq!(state.error, None);
        assert_eq!(state.accounts, baseline::fallback_accounts());
    }

    #[tokio::test]
    async fn test_campaign_failure_during_refresh_clears_connection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .respond_with(ResponseTemplate::new(200).set_body_json(campaign_body()))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .mount(&server)
            .await;

        let connector = connector_for(&server);
        connector.connect("k").await.unwrap();
        let live_view = connector.snapshot().await.view;

        let err = connector.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));

        let state = connector.snapshot().await;
        assert!(!state.connected);
        assert_eq!(state.phase, SessionPhase::Error);
        assert_eq!(
            state.error.as_deref(),
            Some("Invalid API key or failed to connect to the campaign API (401)")
        );
        // no fallback to the demo data
        assert_eq!(state.view, live_view);
    }

    #[tokio::test]
    async fn test_refresh_is_noop_when_disconnected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let connector = connector_for(&server);
        connector.refresh().await.unwrap();
        assert_eq!(connector.snapshot().await.phase, SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_connect_then_disconnect_restores_baseline() {
        let server = MockServer::start().await;
        mount_query_campaigns(&server, "k").await;

        let connector = connector_for(&server);
        connector.connect("k").await.unwrap();
        assert_ne!(connector.snapshot().await.view, DashboardView::baseline());

        connector.disconnect().await.unwrap();
        let state = connector.snapshot().await;
        assert!(!state.connected);
        assert!(!state.has_credential());
        assert_eq!(state.auth_style, None);
        assert!(state.campaigns.is_empty());
        assert!(state.accounts.is_empty());
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.view, DashboardView::baseline());
    }

    #[tokio::test]
    async fn test_second_connect_while_in_flight_is_busy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let connector = Arc::new(connector_for(&server));
        let first = {
            let connector = connector.clone();
            tokio::spawn(async move { connector.connect("k").await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(connector.snapshot().await.loading);
        assert!(matches!(connector.connect("k").await, Err(Error::Busy)));
        assert!(matches!(connector.refresh().await, Err(Error::Busy)));
        assert!(matches!(connector.disconnect().await, Err(Error::Busy)));

        first.await.unwrap().unwrap();
        assert!(connector.snapshot().await.connected);
    }

    #[tokio::test]
    async fn test_dismiss_error_clears_alert() {
        let server = MockServer::start().await;
        let connector = connector_for(&server);
        assert!(connector.connect("nobody").await.is_err());
        assert!(connector.snapshot().await.error.is_some());

        connector.dismiss_error().await;
        assert_eq!(connector.snapshot().await.error, None);
    }

    #[tokio::test]
    async fn test_account_transport_failure_uses_fallback_set() {
        let server = MockServer::start().await;
        mount_query_campaigns(&server, "k").await;
        Mock::given(method("GET"))
            .and(path(ACCOUNTS))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let connector = connector_with_timeout(&server, 1);
        connector.connect("k").await.unwrap();

        let state = connector.snapshot().await;
        assert!(state.connected);
        assert_eq!(state.error, None);
        assert_eq!(state.phase, SessionPhase::Connected);
        assert_eq!(state.accounts, baseline::fallback_accounts());
    }

    #[tokio::test]
    async fn test_abandoned_connect_still_settles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .and(query_param("api_key", "k"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(campaign_body())
                    .set_delay(Duration::from_millis(500)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_query_campaigns(&server, "k").await;

        let connector = connector_for(&server);
        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), connector.connect("k")).await;
        assert!(abandoned.is_err());

        let state = wait_until_settled(&connector).await;
        assert!(!state.loading);
        assert!(state.connected);
        assert_eq!(state.phase, SessionPhase::Connected);

        connector.refresh().await.unwrap();
        connector.disconnect().await.unwrap();
        assert_eq!(connector.snapshot().await.phase, SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_abandoned_refresh_still_settles() {
        let server = MockServer::start().await;
        mount_query_campaigns(&server, "k").await;

        let connector = connector_for(&server);
        connector.connect("k").await.unwrap();

        server.reset().await;
        Mock::given(method("GET"))
            .and(path(CAMPAIGNS))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_string("unavailable")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), connector.refresh()).await;
        assert!(abandoned.is_err());

        let state = wait_until_settled(&connector).await;
        assert!(!state.loading);
        assert_eq!(state.phase, SessionPhase::Error);
        assert_eq!(
            state.error.as_deref(),
            Some("Invalid API key or failed to connect to the campaign API (503)")
        );
        connector.disconnect().await.unwrap();
    }
}
