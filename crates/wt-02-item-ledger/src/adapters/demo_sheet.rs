//! In-memory item sheet answering JSONP requests.
//!
//! Behaves like the remote sheet script: `get` lists or looks up by `id`,
//! `post` appends with a fresh id, `put` replaces by id, and the expiry date
//! is always recomputed from `buy_date + warranty_period`. Plugged into a
//! [`ScriptedTransport`] it lets the whole stack run without a network.

use crate::domain::item::{parse_day, warranty_end, Item, NewItem, DATE_FORMAT};
use chrono::{Days, NaiveDate};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use url::Url;
use wt_01_jsonp_bridge::{
    BridgeConfig, ConfigError, Dispatcher, ScriptReply, ScriptRequest, ScriptedTransport,
};

/// Endpoint the demo dispatcher addresses. Never contacted.
pub const DEMO_ENDPOINT: &str = "https://sheet.demo.invalid/exec";

pub const NOT_FOUND: &str = "not found";

#[derive(Default)]
struct Sheet {
    rows: BTreeMap<u64, Item>,
    next_id: u64,
}

/// Shared in-memory sheet.
#[derive(Clone, Default)]
pub struct DemoSheet {
    sheet: Arc<Mutex<Sheet>>,
}

impl DemoSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet with a few purchases around `today`: one expiring in 10 days,
    /// one in 25, one well in the future and one already expired.
    pub fn seeded(today: NaiveDate) -> Self {
        let sheet = Self::new();
        let bought = |days_ago: u64| {
            today
                .checked_sub_days(Days::new(days_ago))
                .unwrap_or(today)
                .format(DATE_FORMAT)
                .to_string()
        };
        sheet.insert(NewItem::new("Refrigerator", bought(355), 365));
        sheet.insert(NewItem::new("Laptop", bought(705), 730));
        sheet.insert(NewItem::new("Washing machine", bought(100), 1095));
        sheet.insert(NewItem::new("Headphones", bought(400), 365));
        sheet
    }

    /// Append a row, assigning the next id.
    pub fn insert(&self, item: NewItem) -> Item {
        let mut sheet = self.sheet.lock();
        sheet.next_id += 1;
        let id = sheet.next_id;
        let row = with_warranty_date(item.with_id(id));
        sheet.rows.insert(id, row.clone());
        row
    }

    pub fn rows(&self) -> Vec<Item> {
        self.sheet.lock().rows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sheet.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Answer one script request.
    pub fn respond(&self, request: &ScriptRequest) -> ScriptReply {
        debug!(action = ?request.action, params = ?request.params, "Demo sheet request");
        match request.action.as_deref() {
            Some("get") => self.get(request),
            Some("post") => self.post(request),
            Some("put") => self.put(request),
            Some(other) => ScriptReply::err(format!("unknown action: {}", other)),
            None => ScriptReply::err("missing action"),
        }
    }

    /// Transport answering from this sheet.
    pub fn transport(&self) -> ScriptedTransport {
        let sheet = self.clone();
        ScriptedTransport::new(move |request| sheet.respond(request))
    }

    /// Dispatcher wired to this sheet.
    pub fn dispatcher(&self, mut config: BridgeConfig) -> Result<Dispatcher, ConfigError> {
        if config.endpoint.is_none() {
            let endpoint = Url::parse(DEMO_ENDPOINT)
                .map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))?;
            config.endpoint = Some(endpoint);
        }
        Dispatcher::new(config, Arc::new(self.transport()))
    }

    fn get(&self, request: &ScriptRequest) -> ScriptReply {
        let sheet = self.sheet.lock();
        let Some(raw_id) = request.param("id") else {
            return ok(sheet.rows.values().collect::<Vec<_>>());
        };
        match raw_id.parse::<u64>().ok().and_then(|id| sheet.rows.get(&id)) {
            Some(item) => ok(item),
            None => ScriptReply::err(NOT_FOUND),
        }
    }

    fn post(&self, request: &ScriptRequest) -> ScriptReply {
        match data::<NewItem>(request) {
            Ok(item) => ok(&self.insert(item)),
            Err(reply) => reply,
        }
    }

    fn put(&self, request: &ScriptRequest) -> ScriptReply {
        let item = match data::<Item>(request) {
            Ok(item) => item,
            Err(reply) => return reply,
        };
        let Some(id) = item.id else {
            return ScriptReply::err("missing id");
        };

        let mut sheet = self.sheet.lock();
        match sheet.rows.get_mut(&id) {
            Some(row) => {
                *row = with_warranty_date(item);
                ok(&*row)
            }
            None => ScriptReply::err(NOT_FOUND),
        }
    }
}

fn data<T: serde::de::DeserializeOwned>(request: &ScriptRequest) -> Result<T, ScriptReply> {
    let value = request
        .json_param("data")
        .ok_or_else(|| ScriptReply::err("missing data"))?;
    serde_json::from_value(value).map_err(|e| ScriptReply::err(format!("invalid data: {}", e)))
}

fn ok<T: serde::Serialize>(data: T) -> ScriptReply {
    match serde_json::to_value(data) {
        Ok(value) => ScriptReply::ok(value),
        Err(e) => ScriptReply::err(e.to_string()),
    }
}

fn with_warranty_date(mut item: Item) -> Item {
    item.warranty_date = parse_day(&item.buy_date)
        .and_then(|day| warranty_end(day, item.warranty_period))
        .map(|day| day.format(DATE_FORMAT).to_string());
    item
}
