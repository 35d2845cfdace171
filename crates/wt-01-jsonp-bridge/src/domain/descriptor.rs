//! Call descriptors and outbound URL encoding.
//!
//! Outbound address format:
//!
//! ```text
//! <endpoint>?action=<action>&<key>=<value>*&callback=<correlation id>
//! ```
//!
//! Structured values are JSON-encoded once, then form-urlencoded once along
//! with everything else. Strings go in verbatim, other scalars stringified.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::RemoteCallError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Query keys the bridge writes itself.
const RESERVED_KEYS: [&str; 2] = ["action", "callback"];

/// Fixed remote operation vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Read one item (`id`) or all items
    Get,
    /// Create an item (`data`)
    Post,
    /// Update an item (`data` with `id`)
    Put,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Post => "post",
            Action::Put => "put",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = RemoteCallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Action::Get),
            "post" => Ok(Action::Post),
            "put" => Ok(Action::Put),
            other => Err(RemoteCallError::InvalidRequest(format!(
                "unknown action: {:?}",
                other
            ))),
        }
    }
}

/// One remote call: an action plus its parameter bag.
///
/// Parameters are converted to JSON as they are added, so a value that
/// cannot be represented fails here, before any network activity.
#[derive(Debug, Clone, PartialEq)]
pub struct CallDescriptor {
    action: Action,
    params: BTreeMap<String, Value>,
}

impl CallDescriptor {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter.
    pub fn param<V>(mut self, key: impl Into<String>, value: &V) -> Result<Self, RemoteCallError>
    where
        V: Serialize + ?Sized,
    {
        let key = key.into();
        if key.is_empty() {
            return Err(RemoteCallError::InvalidRequest(
                "parameter key must not be empty".into(),
            ));
        }
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(RemoteCallError::InvalidRequest(format!(
                "parameter key {:?} is reserved",
                key
            )));
        }
        let value = serde_json::to_value(value).map_err(|e| {
            RemoteCallError::InvalidRequest(format!("parameter {:?} is not serializable: {}", key, e))
        })?;
        self.params.insert(key, value);
        Ok(self)
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }

    /// Build the script URL for this call.
    ///
    /// Query pairs already present on `endpoint` are kept ahead of `action`.
    pub fn encode_url(&self, endpoint: &Url, callback: &CorrelationId) -> Url {
        let mut url = endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("action", self.action.as_str());
            for (key, value) in &self.params {
                query.append_pair(key, &encode_value(value));
            }
            query.append_pair("callback", callback.as_str());
        }
        url
    }
}

/// Stringify one parameter value for the query.
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
