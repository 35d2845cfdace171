//! # Bridge Settlement over HTTP
//!
//! Every settlement path of the dispatcher, with scripts fetched by the real
//! `reqwest` transport from a local JSONP server:
//!
//! 1. **Callback**: data resolves, `success: false` rejects with the remote message
//! 2. **Transport**: error status, closed port, non-invoking script
//! 3. **Timer**: a server that never answers
//! 4. **Cancel**: caller abandons a call in flight
//!
//! After each path the callback table and the script document are empty.

#[cfg(test)]
mod tests {
    use crate::harness::JsonpServer;
    use futures::future::join_all;
    use serde_json::{json, Value};
    use std::time::Duration;
    use wt_01_jsonp_bridge::{
        Action, CallDescriptor, Dispatcher, ErrorKind, PendingCall, RemoteCallError, ScriptReply,
        TransportError,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn assert_clean(dispatcher: &Dispatcher) {
        assert_eq!(dispatcher.pending_count(), 0, "callback table not empty");
        assert_eq!(dispatcher.attached_count(), 0, "script nodes left attached");
    }

    fn get(id: u64) -> CallDescriptor {
        CallDescriptor::new(Action::Get).param("id", &id).unwrap()
    }

    // =============================================================================
    // CALLBACK PATH
    // =============================================================================

    #[tokio::test]
    async fn test_create_round_trip_over_http() {
        let server = JsonpServer::spawn(|req| {
            let data = req.json_param("data").unwrap();
            let mut created = data.clone();
            created["id"] = json!(7);
            created["warranty_date"] = json!("2025-01-01");
            ScriptReply::ok(created)
        })
        .await
        .unwrap();
        let dispatcher = server.dispatcher();

        let payload = json!({"name": "Fridge", "buy_date": "2024-01-01", "warranty_period": 365});
        let created: Value = dispatcher
            .call(CallDescriptor::new(Action::Post).param("data", &payload).unwrap())
            .await
            .unwrap();

        assert_eq!(
            created,
            json!({
                "id": 7,
                "name": "Fridge",
                "buy_date": "2024-01-01",
                "warranty_period": 365,
                "warranty_date": "2025-01-01"
            })
        );
        let served = server.requests();
        assert_eq!(served.len(), 1);
        assert_eq!(served[0].action.as_deref(), Some("post"));
        assert!(served[0]
            .callback
            .as_deref()
            .unwrap()
            .starts_with("jsonp_callback_"));
        assert_clean(&dispatcher);
    }

    #[tokio::test]
    async fn test_application_error_over_http() {
        let server = JsonpServer::spawn(|_| ScriptReply::err("not found")).await.unwrap();
        let dispatcher = server.dispatcher();

        let err = dispatcher.call::<Value>(get(99)).await.unwrap_err();
        assert_eq!(err, RemoteCallError::Application("not found".into()));
        assert_eq!(server.requests()[0].param("id"), Some("99"));
        assert_clean(&dispatcher);
    }

    // =============================================================================
    // TRANSPORT PATH
    // =============================================================================

    #[tokio::test]
    async fn test_error_status_is_transport_failure() {
        let server = JsonpServer::spawn(|_| ScriptReply::Fail(TransportError::Status(500)))
            .await
            .unwrap();
        let dispatcher = server.dispatcher();

        let err = dispatcher.call::<Value>(get(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.to_string().is_empty());
        assert_clean(&dispatcher);
    }

    #[tokio::test]
    async fn test_closed_port_is_transport_failure() {
        let server = JsonpServer::spawn(|_| ScriptReply::ok(json!(1))).await.unwrap();
        let dispatcher = server.dispatcher();
        drop(server);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = dispatcher.call::<Value>(get(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_clean(&dispatcher);
    }

    #[tokio::test]
    async fn test_html_error_page_is_transport_failure() {
        let server = JsonpServer::spawn(|_| {
            ScriptReply::Body("<!DOCTYPE html><title>Error</title>".into())
        })
        .await
        .unwrap();
        let dispatcher = server.dispatcher();

        let err = dispatcher.call::<Value>(get(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_clean(&dispatcher);
    }

    // =============================================================================
    // TIMER AND CANCEL PATHS
    // =============================================================================

    #[tokio::test]
    async fn test_unanswered_call_times_out() {
        let server = JsonpServer::spawn(|_| ScriptReply::Hang).await.unwrap();
        let dispatcher = server.dispatcher();

        let err = dispatcher
            .dispatch_with_timeout::<Value>(get(1), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert_eq!(err, RemoteCallError::Timeout(Duration::from_millis(200)));
        assert_clean(&dispatcher);
        assert_eq!(dispatcher.stats().timeouts, 1);
    }

    #[tokio::test]
    async fn test_per_call_timeout_outlasts_configured_timeout() {
        let server = JsonpServer::spawn(|_| ScriptReply::Hang).await.unwrap();
        let dispatcher = Dispatcher::with_http(server.config(Duration::from_millis(300))).unwrap();

        let err = dispatcher
            .dispatch_with_timeout::<Value>(get(1), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, RemoteCallError::Timeout(Duration::from_secs(1)));
        assert_eq!(dispatcher.stats().transport_errors, 0);
        assert_clean(&dispatcher);
    }

    #[tokio::test]
    async fn test_cancel_in_flight() {
        let server = JsonpServer::spawn(|_| ScriptReply::Hang).await.unwrap();
        let dispatcher = server.dispatcher();

        let pending = dispatcher.dispatch::<Value>(get(1));
        let handle = pending.cancel_handle();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(handle.cancel());
        assert_eq!(pending.await.unwrap_err(), RemoteCallError::Cancelled);
        assert_clean(&dispatcher);
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_mixed_concurrent_calls_leave_nothing_behind() {
        let server = JsonpServer::spawn(|req| {
            let id: u64 = req.param("id").unwrap().parse().unwrap();
            match id % 3 {
                0 => ScriptReply::ok(json!(id)),
                1 => ScriptReply::err(format!("item {} locked", id)),
                _ => ScriptReply::Fail(TransportError::Status(503)),
            }
        })
        .await
        .unwrap();
        let dispatcher = server.dispatcher();

        let calls: Vec<PendingCall<u64>> = (0..30).map(|id| dispatcher.dispatch(get(id))).collect();
        let results = join_all(calls).await;

        for (id, result) in results.into_iter().enumerate() {
            let id = id as u64;
            match id % 3 {
                0 => assert_eq!(result.unwrap(), id),
                1 => assert_eq!(result.unwrap_err().to_string(), format!("item {} locked", id)),
                _ => assert_eq!(result.unwrap_err().kind(), ErrorKind::Transport),
            }
        }

        let stats = dispatcher.stats();
        assert_eq!(stats.dispatched, 30);
        assert_eq!(stats.succeeded, 10);
        assert_eq!(stats.failed, 10);
        assert_eq!(stats.transport_errors, 10);
        assert_clean(&dispatcher);
    }
}
