//! # Ledger Flows
//!
//! The item ledger against the demo sheet served over HTTP: list, create,
//! edit, upcoming expiry, and error reporting.

#[cfg(test)]
mod tests {
    use crate::harness::JsonpServer;
    use chrono::{Days, NaiveDate};
    use std::sync::Arc;
    use wt_01_jsonp_bridge::ErrorKind;
    use wt_02_item_ledger::{
        DemoSheet, FixedClock, FormField, ItemGateway, ItemLedger, ItemService, NewItem,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    async fn setup() -> (JsonpServer, DemoSheet, ItemService) {
        let sheet = DemoSheet::seeded(today());
        let server = JsonpServer::sheet(sheet.clone()).await.unwrap();
        let service = ItemService::new(server.dispatcher());
        (server, sheet, service)
    }

    fn ledger(service: &ItemService) -> ItemLedger {
        ItemLedger::with_clock(Arc::new(service.clone()), Arc::new(FixedClock(today())))
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_list_and_expiring() {
        let (_server, _sheet, service) = setup().await;
        let mut ledger = ledger(&service);

        ledger.fetch_items().await;
        assert!(ledger.error().is_none());
        assert_eq!(ledger.items().len(), 4);

        let names: Vec<_> = ledger.expiring_today().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Refrigerator", "Laptop"]);
    }

    #[tokio::test]
    async fn test_create_edit_cycle() {
        let (_server, sheet, service) = setup().await;
        let mut ledger = ledger(&service);

        let buy = (today() - Days::new(360)).format("%Y-%m-%d").to_string();
        ledger.form_mut().name = "Fridge".into();
        ledger.form_mut().buy_date = buy.clone();
        assert!(ledger.submit_form().await);
        let created = ledger.last_saved().cloned().unwrap();
        assert_eq!(created.id, Some(5));
        assert_eq!(sheet.len(), 5);

        ledger.fetch_item(5).await;
        assert!(ledger.is_edit_mode());
        assert_eq!(ledger.form().buy_date, buy);
        ledger.form_mut().warranty_period = 368;
        assert!(ledger.submit_form().await);
        assert!(!ledger.is_edit_mode());

        ledger.fetch_items().await;
        let expiring: Vec<_> = ledger
            .expiring_today()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(expiring, vec!["Fridge", "Refrigerator", "Laptop"]);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_server() {
        let (server, _sheet, service) = setup().await;
        let mut ledger = ledger(&service);
        ledger.form_mut().warranty_period = 0;

        assert!(!ledger.submit_form().await);
        let fields: Vec<_> = ledger.form_errors().keys().copied().collect();
        assert_eq!(
            fields,
            vec![FormField::Name, FormField::BuyDate, FormField::WarrantyPeriod]
        );
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_item_message() {
        let (_server, _sheet, service) = setup().await;
        let mut ledger = ledger(&service);

        ledger.fetch_item(99).await;
        assert_eq!(ledger.error(), Some("not found"));
        assert!(!ledger.is_loading());
    }

    #[tokio::test]
    async fn test_update_without_id_is_local() {
        let (server, _sheet, service) = setup().await;
        let item = wt_02_item_ledger::Item {
            id: None,
            ..NewItem::new("Ghost", "2024-01-01", 10).with_id(0)
        };

        let err = service.update(&item).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(server.requests().is_empty());
    }
}
