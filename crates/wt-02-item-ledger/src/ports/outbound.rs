//! Outbound Ports (Driven Ports)
//!
//! Dependencies the ledger state needs: the remote item operations and the
//! current date.

use crate::domain::item::{Item, NewItem};
use async_trait::async_trait;
use chrono::NaiveDate;
use wt_01_jsonp_bridge::CallResult;

/// Remote item operations.
#[async_trait]
pub trait ItemGateway: Send + Sync {
    /// All items.
    async fn get_all(&self) -> CallResult<Vec<Item>>;

    /// One item; a missing id is an application error from the remote.
    async fn get_by_id(&self, id: u64) -> CallResult<Item>;

    /// Create an item and return it with its assigned id.
    async fn create(&self, item: &NewItem) -> CallResult<Item>;

    /// Replace an item. Rejected locally when `item.id` is absent.
    async fn update(&self, item: &Item) -> CallResult<Item>;
}

/// Source of "today" for expiry checks.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
