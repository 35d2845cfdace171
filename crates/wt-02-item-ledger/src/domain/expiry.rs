//! Upcoming warranty expiry.

use crate::domain::item::Item;
use chrono::{Days, NaiveDate};

/// Days ahead of today that count as "expiring soon".
pub const EXPIRY_WINDOW_DAYS: u64 = 30;

/// Items whose warranty ends within `window_days` of `today`, inclusive at
/// both ends, soonest first.
///
/// Items without a parseable warranty date are skipped.
pub fn expiring_within(items: &[Item], today: NaiveDate, window_days: u64) -> Vec<Item> {
    let Some(horizon) = today.checked_add_days(Days::new(window_days)) else {
        return Vec::new();
    };

    let mut expiring: Vec<(NaiveDate, &Item)> = items
        .iter()
        .filter_map(|item| item.warranty_day().map(|day| (day, item)))
        .filter(|(day, _)| *day >= today && *day <= horizon)
        .collect();
    expiring.sort_by_key(|(day, _)| *day);

    expiring.into_iter().map(|(_, item)| item.clone()).collect()
}
