//! Item entity as the remote sheet stores it.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Warranty period a fresh form starts with, in days.
pub const DEFAULT_WARRANTY_PERIOD: u32 = 365;

/// Calendar date format on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A purchased item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Assigned by the remote on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    /// Purchase date; the remote may return a full timestamp
    pub buy_date: String,
    /// Warranty length in days
    pub warranty_period: u32,
    /// Expiry date, computed by the remote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_date: Option<String>,
}

impl Item {
    /// Parsed expiry date, if present and well formed.
    pub fn warranty_day(&self) -> Option<NaiveDate> {
        self.warranty_date.as_deref().and_then(parse_day)
    }
}

/// Payload for creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub buy_date: String,
    pub warranty_period: u32,
}

impl NewItem {
    pub fn new(name: impl Into<String>, buy_date: impl Into<String>, warranty_period: u32) -> Self {
        Self {
            name: name.into(),
            buy_date: buy_date.into(),
            warranty_period,
        }
    }

    /// Full item under `id`, without an expiry date.
    pub fn with_id(self, id: u64) -> Item {
        Item {
            id: Some(id),
            name: self.name,
            buy_date: self.buy_date,
            warranty_period: self.warranty_period,
            warranty_date: None,
        }
    }
}

/// Date part of a date or timestamp string (everything before the first `T`).
pub fn date_part(raw: &str) -> &str {
    raw.split_once('T').map_or(raw, |(day, _)| day)
}

/// Parse a date or the date part of a timestamp.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_part(raw.trim()), DATE_FORMAT).ok()
}

/// Expiry date for a purchase date and a period in days.
pub fn warranty_end(buy_date: NaiveDate, warranty_period: u32) -> Option<NaiveDate> {
    buy_date.checked_add_days(Days::new(u64::from(warranty_period)))
}
