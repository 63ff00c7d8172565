//! Dashboard aggregation
//!
//! Pure derivations from the raw campaign and mailbox lists into the
//! structures the dashboard renders. Nothing here fails: missing counters
//! are already zero after decoding and every rate guards against a zero
//! denominator.

use campaignlens_common::{Campaign, MailboxAccount};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::baseline;

/// Default number of rows in the recent campaigns table
pub const RECENT_CAMPAIGNS_LIMIT: usize = 5;

/// Default number of rows in the top performers list
pub const TOP_PERFORMERS_LIMIT: usize = 4;

/// Month labels of the performance chart
pub const MONTH_LABELS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

/// Accounts below this health score need attention
pub const ATTENTION_HEALTH_THRESHOLD: u64 = 70;

/// Headline metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_emails: u64,
    pub open_rate: f64,
    pub click_rate: f64,
    pub response_rate: f64,
    pub bounce_rate: f64,
}

/// One slice of the email status chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusBucket {
    pub name: String,
    pub value: u64,
    pub color: String,
}

impl StatusBucket {
    pub(crate) fn new(name: &str, value: u64, color: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            color: color.to_string(),
        }
    }
}

/// One month of the campaign performance chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub name: String,
    pub sent: u64,
    pub opened: u64,
    pub clicked: u64,
    pub responded: u64,
}

impl MonthlyPoint {
    pub(crate) fn new(name: &str, sent: u64, opened: u64, clicked: u64, responded: u64) -> Self {
        Self {
            name: name.to_string(),
            sent,
            opened,
            clicked,
            responded,
        }
    }
}

/// Opens and clicks at one time of day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementPoint {
    pub time: String,
    pub opens: u64,
    pub clicks: u64,
}

/// A row of the recent campaigns table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCampaign {
    pub id: String,
    pub name: String,
    pub status: String,
    pub sent: u64,
    /// Percentage with one decimal, e.g. "28.4"
    pub open_rate: String,
    /// Percentage with one decimal, e.g. "4.1"
    pub click_rate: String,
    pub responses: u64,
}

/// A row of the top performers list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub name: String,
    pub open_rate: f64,
    pub responses: u64,
}

/// Mailbox fleet overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub total: usize,
    pub active: usize,
    pub average_health: u64,
    pub needs_attention: usize,
}

/// Health band used to color an account's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthTier {
    Good,
    Fair,
    Poor,
}

impl HealthTier {
    pub fn for_score(score: u64) -> Self {
        if score >= 90 {
            HealthTier::Good
        } else if score >= ATTENTION_HEALTH_THRESHOLD {
            HealthTier::Fair
        } else {
            HealthTier::Poor
        }
    }
}

impl std::fmt::Display for HealthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthTier::Good => write!(f, "good"),
            HealthTier::Fair => write!(f, "fair"),
            HealthTier::Poor => write!(f, "poor"),
        }
    }
}

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub metrics: DashboardMetrics,
    pub status_distribution: Vec<StatusBucket>,
    pub monthly_series: Vec<MonthlyPoint>,
    pub engagement: Vec<EngagementPoint>,
    pub recent_campaigns: Vec<RecentCampaign>,
    pub top_performers: Vec<TopPerformer>,
    pub account_summary: AccountSummary,
}

impl DashboardView {
    /// The demo view shown before connecting and after disconnecting
    pub fn baseline() -> Self {
        Self {
            metrics: baseline::metrics(),
            status_distribution: baseline::status_distribution(),
            monthly_series: baseline::monthly_series(),
            engagement: baseline::engagement(),
            recent_campaigns: baseline::recent_campaigns(),
            top_performers: baseline::top_performers(),
            account_summary: summarize_accounts(&baseline::fallback_accounts()),
        }
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::baseline()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    sent: u64,
    opened: u64,
    clicked: u64,
    replied: u64,
    bounced: u64,
}

impl Totals {
    fn of<'a>(campaigns: impl IntoIterator<Item = &'a Campaign>) -> Self {
        campaigns.into_iter().fold(Self::default(), |mut t, c| {
            t.add(c);
            t
        })
    }

    fn add(&mut self, campaign: &Campaign) {
        self.sent = self.sent.saturating_add(campaign.sent_count);
        self.opened = self.opened.saturating_add(campaign.open_count);
        self.clicked = self.clicked.saturating_add(campaign.click_count);
        self.replied = self.replied.saturating_add(campaign.reply_count);
        self.bounced = self.bounced.saturating_add(campaign.bounce_count);
    }
}

/// `count / sent * 100`, or 0 when nothing was sent
pub fn rate(count: u64, sent: u64) -> f64 {
    if sent == 0 {
        0.0
    } else {
        count as f64 * 100.0 / sent as f64
    }
}

/// Sum counters across all campaigns and derive the headline rates
pub fn derive_metrics(campaigns: &[Campaign]) -> DashboardMetrics {
    let totals = Totals::of(campaigns);

    DashboardMetrics {
        total_emails: totals.sent,
        open_rate: rate(totals.opened, totals.sent),
        click_rate: rate(totals.clicked, totals.sent),
        response_rate: rate(totals.replied, totals.sent),
        bounce_rate: rate(totals.bounced, totals.sent),
    }
}

/// The five status buckets.
///
/// Delivered is `sent - bounced` and saturates at zero when the API reports
/// more bounces than sends.
pub fn derive_status_distribution(campaigns: &[Campaign]) -> Vec<StatusBucket> {
    let totals = Totals::of(campaigns);

    if totals.bounced > totals.sent {
        warn!(
            sent = totals.sent,
            bounced = totals.bounced,
            "More bounces than sends reported; clamping delivered to zero"
        );
    }

    vec![
        StatusBucket::new(
            "Delivered",
            totals.sent.saturating_sub(totals.bounced),
            baseline::COLOR_DELIVERED,
        ),
        StatusBucket::new("Opened", totals.opened, baseline::COLOR_OPENED),
        StatusBucket::new("Clicked", totals.clicked, baseline::COLOR_CLICKED),
        StatusBucket::new("Bounced", totals.bounced, baseline::COLOR_BOUNCED),
        StatusBucket::new("Replied", totals.replied, baseline::COLOR_REPLIED),
    ]
}

/// Group campaigns into Jan..Jun by creation month.
///
/// The reference year is the year of the newest dated campaign. Undated
/// campaigns and campaigns outside Jan..Jun of that year are not counted.
pub fn derive_monthly_series(campaigns: &[Campaign]) -> Vec<MonthlyPoint> {
    let mut buckets = [Totals::default(); MONTH_LABELS.len()];

    let reference_year = campaigns
        .iter()
        .filter_map(|c| c.created_at)
        .map(|at| at.year())
        .max();

    if let Some(year) = reference_year {
        for campaign in campaigns {
            let Some(created_at) = campaign.created_at else {
                continue;
            };
            if created_at.year() != year {
                continue;
            }
            if let Some(bucket) = buckets.get_mut(created_at.month0() as usize) {
                bucket.add(campaign);
            }
        }
    }

    MONTH_LABELS
        .iter()
        .zip(buckets.iter())
        .map(|(label, t)| MonthlyPoint::new(label, t.sent, t.opened, t.clicked, t.replied))
        .collect()
}

/// First `limit` campaigns in list order, formatted for the table
pub fn derive_recent_campaigns(campaigns: &[Campaign], limit: usize) -> Vec<RecentCampaign> {
    campaigns
        .iter()
        .take(limit)
        .map(|c| RecentCampaign {
            id: or_placeholder(&c.id, "unknown"),
            name: or_placeholder(&c.name, "Unnamed Campaign"),
            status: or_placeholder(&c.status, "Unknown"),
            sent: c.sent_count,
            open_rate: format!("{:.1}", rate(c.open_count, c.sent_count)),
            click_rate: format!("{:.1}", rate(c.click_count, c.sent_count)),
            responses: c.reply_count,
        })
        .collect()
}

/// Campaigns that sent anything, ranked by open rate.
///
/// Ties keep their original order.
pub fn derive_top_performers(campaigns: &[Campaign], limit: usize) -> Vec<TopPerformer> {
    let mut performers: Vec<TopPerformer> = campaigns
        .iter()
        .filter(|c| c.sent_count > 0)
        .map(|c| TopPerformer {
            name: or_placeholder(&c.name, "Unnamed Campaign"),
            open_rate: rate(c.open_count, c.sent_count),
            responses: c.reply_count,
        })
        .collect();

    performers.sort_by(|a, b| b.open_rate.total_cmp(&a.open_rate));
    performers.truncate(limit);
    performers
}

/// Fleet overview of the mailbox accounts
pub fn summarize_accounts(accounts: &[MailboxAccount]) -> AccountSummary {
    let total = accounts.len();
    let health_sum: u64 = accounts.iter().map(|a| a.health_score).sum();
    let average_health = if total == 0 {
        0
    } else {
        (health_sum as f64 / total as f64).round() as u64
    };

    AccountSummary {
        total,
        active: accounts.iter().filter(|a| a.status == "active").count(),
        average_health,
        needs_attention: accounts
            .iter()
            .filter(|a| a.status == "warning" || a.health_score < ATTENTION_HEALTH_THRESHOLD)
            .count(),
    }
}

/// Build the full live view from fetched data
pub fn derive_view(campaigns: &[Campaign], accounts: &[MailboxAccount]) -> DashboardView {
    DashboardView {
        metrics: derive_metrics(campaigns),
        status_distribution: derive_status_distribution(campaigns),
        monthly_series: derive_monthly_series(campaigns),
        // the campaign API exposes no time-of-day breakdown
        engagement: baseline::engagement(),
        recent_campaigns: derive_recent_campaigns(campaigns, RECENT_CAMPAIGNS_LIMIT),
        top_performers: derive_top_performers(campaigns, TOP_PERFORMERS_LIMIT),
        account_summary: summarize_accounts(accounts),
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}
