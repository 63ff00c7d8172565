//! Built-in demo baseline
//!
//! Shown before a key is connected and restored on disconnect. The mailbox
//! account set doubles as the fallback when the account request fails.

use campaignlens_common::MailboxAccount;

use crate::aggregate::{
    DashboardMetrics, EngagementPoint, MonthlyPoint, RecentCampaign, StatusBucket, TopPerformer,
};

pub const COLOR_DELIVERED: &str = "#10b981";
pub const COLOR_OPENED: &str = "#3b82f6";
pub const COLOR_CLICKED: &str = "#8b5cf6";
pub const COLOR_BOUNCED: &str = "#ef4444";
pub const COLOR_REPLIED: &str = "#f59e0b";

pub fn metrics() -> DashboardMetrics {
    DashboardMetrics {
        total_emails: 15420,
        open_rate: 24.8,
        click_rate: 3.2,
        response_rate: 1.8,
        bounce_rate: 2.1,
    }
}

pub fn monthly_series() -> Vec<MonthlyPoint> {
    vec![
        MonthlyPoint::new("Jan", 2400, 600, 120, 45),
        MonthlyPoint::new("Feb", 2800, 720, 140, 52),
        MonthlyPoint::new("Mar", 3200, 850, 180, 68),
        MonthlyPoint::new("Apr", 2900, 780, 165, 58),
        MonthlyPoint::new("May", 3500, 980, 220, 85),
        MonthlyPoint::new("Jun", 3800, 1100, 280, 95),
    ]
}

pub fn status_distribution() -> Vec<StatusBucket> {
    vec![
        StatusBucket::new("Delivered", 12850, COLOR_DELIVERED),
        StatusBucket::new("Opened", 3190, COLOR_OPENED),
        StatusBucket::new("Clicked", 493, COLOR_CLICKED),
        StatusBucket::new("Bounced", 324, COLOR_BOUNCED),
        StatusBucket::new("Replied", 277, COLOR_REPLIED),
    ]
}

pub fn engagement() -> Vec<EngagementPoint> {
    [
        ("00:00", 45, 8),
        ("04:00", 32, 5),
        ("08:00", 128, 22),
        ("12:00", 185, 35),
        ("16:00", 142, 28),
        ("20:00", 98, 18),
    ]
    .into_iter()
    .map(|(time, opens, clicks)| EngagementPoint {
        time: time.to_string(),
        opens,
        clicks,
    })
    .collect()
}

pub fn recent_campaigns() -> Vec<RecentCampaign> {
    [
        ("1", "Q2 Product Launch", "Active", 2500, "28.4", "4.1", 45),
        ("2", "Summer Sale Outreach", "Completed", 1800, "22.1", "2.8", 32),
        ("3", "Partnership Proposal", "Active", 950, "31.2", "5.2", 28),
        ("4", "Feature Update Announcement", "Paused", 3200, "19.8", "2.1", 18),
        ("5", "Customer Feedback Survey", "Active", 1200, "35.6", "8.3", 67),
    ]
    .into_iter()
    .map(
        |(id, name, status, sent, open_rate, click_rate, responses)| RecentCampaign {
            id: id.to_string(),
            name: name.to_string(),
            status: status.to_string(),
            sent,
            open_rate: open_rate.to_string(),
            click_rate: click_rate.to_string(),
            responses,
        },
    )
    .collect()
}

pub fn top_performers() -> Vec<TopPerformer> {
    [
        ("Customer Feedback Survey", 35.6, 67),
        ("Partnership Proposal", 31.2, 28),
        ("Q2 Product Launch", 28.4, 45),
        ("Summer Sale Outreach", 22.1, 32),
    ]
    .into_iter()
    .map(|(name, open_rate, responses)| TopPerformer {
        name: name.to_string(),
        open_rate,
        responses,
    })
    .collect()
}

/// Demo mailbox accounts, also substituted when the account request fails
pub fn fallback_accounts() -> Vec<MailboxAccount> {
    vec![
        account(
            "1",
            "sales@company.com",
            "active",
            95,
            (50, 23),
            ("excellent", "completed"),
            "2024-01-23T10:30:00Z",
            "Gmail",
            (2.1, 0.5, 97.8),
        ),
        account(
            "2",
            "outreach@company.com",
            "active",
            88,
            (40, 35),
            ("good", "in_progress"),
            "2024-01-23T09:15:00Z",
            "Outlook",
            (3.2, 1.1, 94.5),
        ),
        account(
            "3",
            "marketing@company.com",
            "paused",
            72,
            (30, 0),
            ("fair", "needed"),
            "2024-01-22T16:45:00Z",
            "Gmail",
            (5.8, 2.3, 89.2),
        ),
        account(
            "4",
            "support@company.com",
            "warning",
            65,
            (25, 18),
            ("needs_attention", "paused"),
            "2024-01-23T08:20:00Z",
            "Yahoo",
            (7.2, 3.1, 85.7),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn account(
    id: &str,
    email: &str,
    status: &str,
    health_score: u64,
    (daily_limit, sent_today): (u64, u64),
    (reputation, warmup_status): (&str, &str),
    last_activity: &str,
    provider: &str,
    (bounce_rate, spam_rate, deliverability): (f64, f64, f64),
) -> MailboxAccount {
    MailboxAccount {
        id: id.to_string(),
        email: email.to_string(),
        status: status.to_string(),
        health_score,
        daily_limit,
        sent_today,
        reputation: reputation.to_string(),
        warmup_status: warmup_status.to_string(),
        last_activity: last_activity.to_string(),
        provider: provider.to_string(),
        bounce_rate,
        spam_rate,
        deliverability,
    }
}
