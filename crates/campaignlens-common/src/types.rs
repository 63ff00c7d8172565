//! Records decoded from the remote campaign API
//!
//! The remote service is loosely typed: counters may be missing, `null`,
//! numeric strings or floats, and ids may be numbers. Every field decodes
//! leniently so that a single odd record never fails a whole response.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One outbound email sequence with aggregate counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_leads: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub sent_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub open_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub click_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reply_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bounce_count: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Create a campaign with the engagement counters set
    pub fn with_counts(
        name: impl Into<String>,
        sent: u64,
        opened: u64,
        clicked: u64,
        replied: u64,
        bounced: u64,
    ) -> Self {
        Self {
            name: name.into(),
            sent_count: sent,
            open_count: opened,
            click_count: clicked,
            reply_count: replied,
            bounce_count: bounced,
            ..Default::default()
        }
    }
}

/// One sending identity with health and reputation telemetry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailboxAccount {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    /// "active", "paused" or "warning"; not a closed set upstream
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    /// 0-100
    #[serde(default, deserialize_with = "lenient_score")]
    pub health_score: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub daily_limit: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub sent_today: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reputation: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub warmup_status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_activity: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub provider: String,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub bounce_rate: f64,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub spam_rate: f64,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub deliverability: f64,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(count_from_value).unwrap_or(0))
}

fn lenient_score<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_count(deserializer).map(|score| score.min(100))
}

fn lenient_rate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(float_from_value).unwrap_or(0.0))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_timestamp(&s),
        _ => None,
    })
}

/// Non-negative integer view of a JSON value; anything else is zero
pub fn count_from_value(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    float_from_value(value)
        .filter(|f| *f > 0.0)
        .map(|f| f as u64)
        .unwrap_or(0)
}

fn float_from_value(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

/// Parse RFC 3339, a zone-less ISO datetime (taken as UTC) or a bare date
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
