//! Local JSONP server.
//!
//! Serves `GET /exec` by handing the request URL to a [`ScriptedTransport`]
//! and returning what it produces as a script body. A
//! `TransportError::Status` from the responder becomes that HTTP status.

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;
use wt_01_jsonp_bridge::{
    BridgeConfig, Dispatcher, ScriptReply, ScriptRequest, ScriptTransport, ScriptedTransport,
    TransportError,
};
use wt_02_item_ledger::DemoSheet;

/// JSONP server bound to an ephemeral localhost port. Stops on drop.
pub struct JsonpServer {
    addr: SocketAddr,
    responder: Arc<ScriptedTransport>,
    task: JoinHandle<()>,
}

impl JsonpServer {
    /// Serve replies from `responder`.
    pub async fn spawn<F>(responder: F) -> std::io::Result<Self>
    where
        F: Fn(&ScriptRequest) -> ScriptReply + Send + Sync + 'static,
    {
        let responder = Arc::new(ScriptedTransport::new(responder));
        let app = Router::new()
            .route("/exec", get(serve_script))
            .with_state(Arc::clone(&responder));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            responder,
            task,
        })
    }

    /// Serve the demo item sheet.
    pub async fn sheet(sheet: DemoSheet) -> std::io::Result<Self> {
        Self::spawn(move |request| sheet.respond(request)).await
    }

    pub fn endpoint(&self) -> Url {
        Url::parse(&format!("http://{}/exec", self.addr)).expect("socket address forms a URL")
    }

    /// Bridge config pointing here, with `timeout` per call.
    pub fn config(&self, timeout: Duration) -> BridgeConfig {
        BridgeConfig {
            timeout,
            ..BridgeConfig::with_endpoint(self.endpoint())
        }
    }

    /// Dispatcher over the real HTTP transport.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::with_http(self.config(Duration::from_secs(10)))
            .expect("local server config is valid")
    }

    /// Requests served so far
    pub fn requests(&self) -> Vec<ScriptRequest> {
        self.responder.requests()
    }
}

impl Drop for JsonpServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_script(State(responder): State<Arc<ScriptedTransport>>, uri: Uri) -> Response {
    let url = match Url::parse(&format!("http://jsonp.local{}", uri)) {
        Ok(url) => url,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match responder.fetch(&url).await {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(TransportError::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
