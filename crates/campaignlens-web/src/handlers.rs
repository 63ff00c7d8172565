//! Web UI Handlers
//!
//! Request handlers for the web UI.

use crate::{AppState, StaticAssets};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use campaignlens_common::{Error, MailboxAccount, Result};
use campaignlens_core::{AuthStyle, DashboardView, HealthTier, SessionPhase};
use serde::{Deserialize, Serialize};

/// Health check handler
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Serve static files
pub async fn static_file(Path(path): Path<String>) -> impl IntoResponse {
    match StaticAssets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Dashboard page
pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.connector.snapshot().await;
    let campaign_count = session.campaigns.len();
    let top_performers = session.display_top_performers();
    let context = serde_json::json!({
        "title": "Dashboard",
        "active_page": "dashboard",
        "session": session,
        "campaign_count": campaign_count,
        "top_performers": top_performers,
    });

    render(&state, "dashboard", &context)
}

/// A mailbox account with display labels
#[derive(Debug, Serialize)]
struct AccountRow {
    #[serde(flatten)]
    account: MailboxAccount,
    tier: HealthTier,
    status_label: String,
    warmup_label: String,
    reputation_label: String,
    last_activity_date: String,
}

impl From<MailboxAccount> for AccountRow {
    fn from(account: MailboxAccount) -> Self {
        let last_activity_date = campaignlens_common::types::parse_timestamp(&account.last_activity)
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        Self {
            tier: HealthTier::for_score(account.health_score),
            status_label: capitalize(&account.status),
            warmup_label: account.warmup_status.replace('_', " "),
            reputation_label: account.reputation.replace('_', " "),
            last_activity_date,
            account,
        }
    }
}

/// Mailbox accounts page
pub async fn accounts(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.connector.snapshot().await;
    let rows: Vec<AccountRow> = session
        .display_accounts()
        .into_iter()
        .map(AccountRow::from)
        .collect();

    let context = serde_json::json!({
        "title": "Email Accounts",
        "active_page": "accounts",
        "session": session,
        "accounts": rows,
    });

    render(&state, "accounts", &context)
}

/// Connect form data
#[derive(Deserialize)]
pub struct ConnectForm {
    #[serde(default)]
    pub api_key: String,
}

/// Connect form submission
pub async fn connect(State(state): State<AppState>, Form(form): Form<ConnectForm>) -> Response {
    action_response(state.connector.connect(&form.api_key).await)
}

/// Refresh button
pub async fn refresh(State(state): State<AppState>) -> Response {
    action_response(state.connector.refresh().await)
}

/// Disconnect button
pub async fn disconnect(State(state): State<AppState>) -> Response {
    action_response(state.connector.disconnect().await)
}

/// Dismiss the alert
pub async fn dismiss(State(state): State<AppState>) -> Response {
    state.connector.dismiss_error().await;
    Redirect::to("/").into_response()
}

/// Dashboard snapshot response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub connected: bool,
    pub phase: SessionPhase,
    pub loading: bool,
    pub error: Option<String>,
    pub auth_style: Option<AuthStyle>,
    pub campaign_count: usize,
    pub view: DashboardView,
}

/// JSON snapshot of the dashboard
pub async fn dashboard_json(State(state): State<AppState>) -> Json<DashboardResponse> {
    let session = state.connector.snapshot().await;
    Json(DashboardResponse {
        connected: session.connected,
        phase: session.phase,
        loading: session.loading,
        error: session.error,
        auth_style: session.auth_style,
        campaign_count: session.campaigns.len(),
        view: session.view,
    })
}

/// Failures are shown from session state, so everything but Busy redirects
fn action_response(result: Result<()>) -> Response {
    match result {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e @ Error::Busy) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::debug!("Session action failed ({}): {}", e.code(), e);
            Redirect::to("/").into_response()
        }
    }
}

fn render(state: &AppState, name: &str, context: &serde_json::Value) -> Response {
    match state.templates.render(name, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
