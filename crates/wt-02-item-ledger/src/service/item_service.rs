//! Item operations over the JSONP bridge.
//!
//! | Operation | Action | Parameters |
//! |-----------|--------|------------|
//! | `get_all` | `get` | none |
//! | `get_by_id` | `get` | `id` |
//! | `create` | `post` | `data` = new item |
//! | `update` | `put` | `data` = full item with `id` |

use crate::domain::item::{Item, NewItem};
use crate::ports::outbound::ItemGateway;
use async_trait::async_trait;
use wt_01_jsonp_bridge::{Action, CallDescriptor, CallResult, Dispatcher, RemoteCallError};

/// [`ItemGateway`] backed by a [`Dispatcher`].
#[derive(Clone)]
pub struct ItemService {
    dispatcher: Dispatcher,
}

impl ItemService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

#[async_trait]
impl ItemGateway for ItemService {
    async fn get_all(&self) -> CallResult<Vec<Item>> {
        self.dispatcher.call(CallDescriptor::new(Action::Get)).await
    }

    async fn get_by_id(&self, id: u64) -> CallResult<Item> {
        let descriptor = CallDescriptor::new(Action::Get).param("id", &id)?;
        self.dispatcher.call(descriptor).await
    }

    async fn create(&self, item: &NewItem) -> CallResult<Item> {
        let descriptor = CallDescriptor::new(Action::Post).param("data", item)?;
        self.dispatcher.call(descriptor).await
    }

    async fn update(&self, item: &Item) -> CallResult<Item> {
        if item.id.is_none() {
            return Err(RemoteCallError::InvalidRequest(
                "item id is required for update".into(),
            ));
        }
        let descriptor = CallDescriptor::new(Action::Put).param("data", item)?;
        self.dispatcher.call(descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;
    use wt_01_jsonp_bridge::{
        BridgeConfig, ErrorKind, ScriptReply, ScriptRequest, ScriptedTransport,
    };

    fn service<F>(responder: F) -> (ItemService, Arc<ScriptedTransport>)
    where
        F: Fn(&ScriptRequest) -> ScriptReply + Send + Sync + 'static,
    {
        let transport = Arc::new(ScriptedTransport::new(responder));
        let config = BridgeConfig::with_endpoint(Url::parse("https://sheet.test/exec").unwrap());
        let dispatcher = Dispatcher::new(config, transport.clone()).unwrap();
        (ItemService::new(dispatcher), transport)
    }

    #[tokio::test]
    async fn test_get_all_sends_bare_get() {
        let (service, transport) = service(|_| {
            ScriptReply::ok(json!([
                {"id": 1, "name": "Fridge", "buy_date": "2024-01-01", "warranty_period": 365},
                {"id": 2, "name": "TV", "buy_date": "2024-02-01", "warranty_period": 730}
            ]))
        });

        let items = service.get_all().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "TV");

        let request = &transport.requests()[0];
        assert_eq!(request.action.as_deref(), Some("get"));
        assert!(request.params.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let (service, transport) = service(|_| ScriptReply::err("not found"));

        let err = service.get_by_id(99).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Application);
        assert_eq!(err.to_string(), "not found");
        assert_eq!(transport.requests()[0].param("id"), Some("99"));
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let created = json!({
            "id": 7,
            "name": "Fridge",
            "buy_date": "2024-01-01",
            "warranty_period": 365,
            "warranty_date": "2025-01-01"
        });
        let reply = created.clone();
        let (service, transport) = service(move |_| ScriptReply::ok(reply.clone()));

        let item = service
            .create(&NewItem::new("Fridge", "2024-01-01", 365))
            .await
            .unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), created);

        let request = &transport.requests()[0];
        assert_eq!(request.action.as_deref(), Some("post"));
        assert_eq!(
            request.json_param("data"),
            Some(json!({"name": "Fridge", "buy_date": "2024-01-01", "warranty_period": 365}))
        );
    }

    #[tokio::test]
    async fn test_update_without_id_never_dispatches() {
        let (service, transport) = service(|_| ScriptReply::ok(json!(null)));
        let item = Item {
            id: None,
            name: "Fridge".into(),
            buy_date: "2024-01-01".into(),
            warranty_period: 365,
            warranty_date: None,
        };

        let err = service.update(&item).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(transport.request_count(), 0);
        assert_eq!(service.dispatcher().stats().dispatched, 0);
    }

    #[tokio::test]
    async fn test_update_sends_full_item() {
        let (service, transport) = service(|req| {
            let data = req.json_param("data").unwrap();
            ScriptReply::ok(data)
        });
        let item = NewItem::new("Fridge", "2024-01-01", 400).with_id(7);

        let updated = service.update(&item).await.unwrap();
        assert_eq!(updated, item);
        assert_eq!(transport.requests()[0].action.as_deref(), Some("put"));
        assert_eq!(transport.requests()[0].json_param("data").unwrap()["id"], 7);
    }
}
