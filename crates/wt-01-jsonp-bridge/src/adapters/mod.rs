//! Adapters: script transports and script evaluation.

pub mod http;
pub mod script;
pub mod scripted;

pub use http::HttpScriptTransport;
pub use scripted::{ScriptReply, ScriptRequest, ScriptedTransport};
