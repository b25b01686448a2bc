//! Change-report records and the input clean-up applied before storing them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const PARK_ID_MAX: usize = 20;
pub const SERVER_ID_MAX: usize = 80;
pub const MAP_VERSION_MAX: usize = 40;
pub const CATEGORY_MAX: usize = 40;
pub const DESCRIPTION_MAX: usize = 2000;
pub const DISPLAY_NAME_MAX: usize = 60;
pub const ADMIN_NOTES_MAX: usize = 2000;

pub const DEFAULT_CATEGORY: &str = "general";

/// Upper bound for any listing
pub const LIST_LIMIT_MAX: usize = 200;
pub const MAP_LIST_DEFAULT_LIMIT: usize = 50;
pub const FEED_DEFAULT_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReportStatus {
    /// Parses a status filter; anything unrecognised means pending
    pub fn parse_or_pending(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("approved") => Self::Approved,
            Some("rejected") => Self::Rejected,
            _ => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area the reporter was looking at, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportBBox {
    pub west: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub north: Option<f64>,
}

/// A stored "what changed here" report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeReport {
    pub id: Uuid,
    pub server_id: String,
    pub map_version: String,
    pub park_id: String,
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
    pub bbox: Option<ReportBBox>,
    pub category: String,
    pub description: String,
    pub display_name: Option<String>,
    pub status: ReportStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

/// A submission as received from the public form. Numeric fields accept JSON
/// numbers or numeric strings; unparseable strings become NaN and are
/// rejected by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub park_id: Option<String>,
    pub server_id: Option<String>,
    pub map_version: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub zoom: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub bbox_west: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub bbox_south: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub bbox_east: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub bbox_north: Option<f64>,
}

impl NewReport {
    pub(crate) fn bbox(&self) -> Option<ReportBBox> {
        let bbox = ReportBBox {
            west: self.bbox_west,
            south: self.bbox_south,
            east: self.bbox_east,
            north: self.bbox_north,
        };
        let any = [bbox.west, bbox.south, bbox.east, bbox.north]
            .iter()
            .any(Option::is_some);
        any.then_some(bbox)
    }
}

/// Admin edit; `None` leaves a field alone. An empty display name or admin
/// note clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEdit {
    pub park_id: Option<String>,
    pub server_id: Option<String>,
    pub map_version: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub admin_notes: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub zoom: Option<f64>,
}

impl ReportEdit {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Trims and cuts to at most `max_chars` characters
pub fn safe_text(value: Option<&str>, max_chars: usize) -> String {
    value
        .map(|v| v.trim().chars().take(max_chars).collect())
        .unwrap_or_default()
}

/// Parses a limit parameter, clamping into `[min, max]`. Like a lenient
/// integer parse, only the leading digits count (`"12.7"` is 12, `"25abc"`
/// is 25); input without any gives `fallback`.
pub fn clamp_limit(raw: Option<&str>, min: usize, max: usize, fallback: usize) -> usize {
    match raw.and_then(leading_integer) {
        Some(n) => n.clamp(min as i64, max as i64) as usize,
        None => fallback,
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let text = raw.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate instead of failing on absurdly long inputs
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

/// Accepts `12.5`, `"12.5"` or null. Blank strings count as missing.
fn loose_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Number(n)) => Some(n),
        Some(LooseNumber::Text(text)) if text.trim().is_empty() => None,
        Some(LooseNumber::Text(text)) => Some(text.trim().parse().unwrap_or(f64::NAN)),
        None => None,
    })
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

pub(crate) fn valid_lat(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub(crate) fn valid_lng(lng: f64) -> bool {
    lng.is_finite() && (-180.0..=180.0).contains(&lng)
}
