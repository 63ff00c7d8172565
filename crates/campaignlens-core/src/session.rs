//! Dashboard session state
//!
//! One owned struct holds everything the dashboard shows. Only the
//! [`Connector`](crate::Connector) mutates it; renderers read snapshots.

use campaignlens_common::{Campaign, Error, MailboxAccount, Result};
use serde::{Deserialize, Serialize};

use crate::aggregate::{DashboardView, TopPerformer};
use crate::baseline;
use crate::client::AuthStyle;

/// Lifecycle of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Showing the demo baseline
    #[default]
    Idle,
    /// Probing authentication styles
    Connecting,
    /// Live data published
    Connected,
    /// Fetching campaigns and accounts
    Retrieving,
    /// Last connect or retrieval failed
    Error,
}

impl SessionPhase {
    /// Whether a network operation is in flight
    pub fn is_busy(self) -> bool {
        matches!(self, SessionPhase::Connecting | SessionPhase::Retrieving)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Connecting => write!(f, "connecting"),
            SessionPhase::Connected => write!(f, "connected"),
            SessionPhase::Retrieving => write!(f, "retrieving"),
            SessionPhase::Error => write!(f, "error"),
        }
    }
}

/// Everything the dashboard needs to render
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    #[serde(skip)]
    pub(crate) api_key: Option<String>,
    pub auth_style: Option<AuthStyle>,
    pub phase: SessionPhase,
    pub connected: bool,
    pub loading: bool,
    /// Text of the dismissible alert
    pub error: Option<String>,
    pub campaigns: Vec<Campaign>,
    pub accounts: Vec<MailboxAccount>,
    pub view: DashboardView,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            api_key: None,
            auth_style: None,
            phase: SessionPhase::Idle,
            connected: false,
            loading: false,
            error: None,
            campaigns: Vec::new(),
            accounts: Vec::new(),
            view: DashboardView::baseline(),
        }
    }
}

impl SessionState {
    /// Whether a key is stored
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Accounts to list: live ones when connected, the demo set otherwise
    pub fn display_accounts(&self) -> Vec<MailboxAccount> {
        if self.connected {
            self.accounts.clone()
        } else {
            baseline::fallback_accounts()
        }
    }

    /// Top performers to list: the demo ranking stands in until a live
    /// campaign has sent something
    pub fn display_top_performers(&self) -> Vec<TopPerformer> {
        if self.connected && !self.view.top_performers.is_empty() {
            self.view.top_performers.clone()
        } else {
            baseline::top_performers()
        }
    }

    /// Enter an in-flight phase, refusing if one is already running
    pub(crate) fn begin(&mut self, phase: SessionPhase) -> Result<()> {
        if self.phase.is_busy() {
            return Err(Error::Busy);
        }
        self.phase = phase;
        self.loading = true;
        self.error = None;
        Ok(())
    }

    pub(crate) fn fail_connect(&mut self, message: String) {
        self.phase = SessionPhase::Error;
        self.connected = false;
        self.loading = false;
        self.api_key = None;
        self.auth_style = None;
        self.error = Some(message);
    }

    pub(crate) fn fail_retrieval(&mut self, message: String) {
        self.phase = SessionPhase::Error;
        self.connected = false;
        self.loading = false;
        self.error = Some(message);
    }

    pub(crate) fn publish(
        &mut self,
        key: &str,
        style: AuthStyle,
        campaigns: Vec<Campaign>,
        accounts: Vec<MailboxAccount>,
        view: DashboardView,
    ) {
        self.api_key = Some(key.to_string());
        self.auth_style = Some(style);
        self.phase = SessionPhase::Connected;
        self.connected = true;
        self.loading = false;
        self.error = None;
        self.campaigns = campaigns;
        self.accounts = accounts;
        self.view = view;
    }

    /// Back to the pre-connection demo experience
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
