//! CampaignLens Core - campaign API connector and dashboard aggregation
//!
//! This crate provides the HTTP client for the remote marketing API, the
//! connector that manages the dashboard session, and the pure aggregation
//! that turns campaign records into display structures.

pub mod aggregate;
pub mod baseline;
pub mod client;
pub mod connector;
pub mod session;

pub use aggregate::{
    derive_metrics, derive_monthly_series, derive_recent_campaigns, derive_status_distribution,
    derive_top_performers, derive_view, summarize_accounts, AccountSummary, DashboardMetrics,
    DashboardView, EngagementPoint, HealthTier, MonthlyPoint, RecentCampaign, StatusBucket,
    TopPerformer,
};
pub use client::{AuthStyle, CampaignClient, ClientError};
pub use connector::Connector;
pub use session::{SessionPhase, SessionState};
