//! In-process script transport.
//!
//! Answers script requests from a responder closure instead of the network.
//! Used by the demo mode of the CLI and by tests that need to control exactly
//! how (and whether) a call's script arrives.

use crate::adapters::script::render;
use crate::domain::envelope::RemoteEnvelope;
use crate::ports::outbound::{ScriptTransport, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Decoded view of an outbound script URL
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest {
    pub url: Url,
    pub action: Option<String>,
    pub callback: Option<String>,
    /// Every other query pair
    pub params: BTreeMap<String, String>,
}

impl ScriptRequest {
    pub fn from_url(url: &Url) -> Self {
        let mut action = None;
        let mut callback = None;
        let mut params = BTreeMap::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "action" => action = Some(value.into_owned()),
                "callback" => callback = Some(value.into_owned()),
                _ => {
                    params.insert(key.into_owned(), value.into_owned());
                }
            }
        }
        Self {
            url: url.clone(),
            action,
            callback,
            params,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parameter decoded as JSON
    pub fn json_param(&self, key: &str) -> Option<Value> {
        self.param(key).and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// How the transport answers one request
#[derive(Debug, Clone)]
pub enum ScriptReply {
    /// Invoke the request's callback with this envelope
    Envelope(RemoteEnvelope),
    /// Return this body verbatim
    Body(String),
    /// Fail the fetch
    Fail(TransportError),
    /// Answer after a delay
    Delayed(Duration, Box<ScriptReply>),
    /// Never answer
    Hang,
}

impl ScriptReply {
    pub fn ok(data: Value) -> Self {
        Self::Envelope(RemoteEnvelope::ok(data))
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self::Envelope(RemoteEnvelope::err(message))
    }

    pub fn after(self, delay: Duration) -> Self {
        Self::Delayed(delay, Box::new(self))
    }
}

type Responder = dyn Fn(&ScriptRequest) -> ScriptReply + Send + Sync;

/// Transport answering from a closure.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<ScriptRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ScriptRequest) -> ScriptReply + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request fetched so far, in order
    pub fn requests(&self) -> Vec<ScriptRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ScriptTransport for ScriptedTransport {
    async fn fetch(&self, src: &Url) -> Result<String, TransportError> {
        let request = ScriptRequest::from_url(src);
        let mut reply = (self.responder)(&request);
        let callback = request.callback.clone().unwrap_or_default();
        self.requests.lock().push(request);

        loop {
            match reply {
                ScriptReply::Envelope(envelope) => {
                    let payload = serde_json::to_value(&envelope)
                        .map_err(|e| TransportError::Body(e.to_string()))?;
                    return Ok(render(&callback, &payload));
                }
                ScriptReply::Body(body) => return Ok(body),
                ScriptReply::Fail(e) => return Err(e),
                ScriptReply::Delayed(delay, next) => {
                    tokio::time::sleep(delay).await;
                    reply = *next;
                }
                ScriptReply::Hang => std::future::pending::<()>().await,
            }
        }
    }
}
