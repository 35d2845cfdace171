//! Item list and form state.
//!
//! The ledger owns what a front end binds to: the loaded list, a loading
//! flag, the last error message, the item form with its validation errors,
//! and the id being edited. Remote failures never escape: they are logged and
//! kept as a message.

use crate::domain::expiry::{expiring_within, EXPIRY_WINDOW_DAYS};
use crate::domain::form::{FieldErrors, ItemForm};
use crate::domain::item::Item;
use crate::ports::outbound::{Clock, ItemGateway, SystemClock};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, Instrument};
use wt_01_jsonp_bridge::Action;
use wt_telemetry::{log_call_event, subsystem_span};

const SUBSYSTEM: &str = "ledger";

/// List and form state over an [`ItemGateway`].
pub struct ItemLedger {
    gateway: Arc<dyn ItemGateway>,
    clock: Arc<dyn Clock>,
    items: Vec<Item>,
    loading: bool,
    error: Option<String>,
    form: ItemForm,
    form_errors: FieldErrors,
    submitting: bool,
    editing_id: Option<u64>,
    last_saved: Option<Item>,
}

impl ItemLedger {
    pub fn new(gateway: Arc<dyn ItemGateway>) -> Self {
        Self::with_clock(gateway, Arc::new(SystemClock))
    }

    pub fn with_clock(gateway: Arc<dyn ItemGateway>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gateway,
            clock,
            items: Vec::new(),
            loading: false,
            error: None,
            form: ItemForm::default(),
            form_errors: FieldErrors::new(),
            submitting: false,
            editing_id: None,
            last_saved: None,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form(&self) -> &ItemForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ItemForm {
        &mut self.form
    }

    pub fn form_errors(&self) -> &FieldErrors {
        &self.form_errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn editing_id(&self) -> Option<u64> {
        self.editing_id
    }

    /// Item returned by the last successful submit
    pub fn last_saved(&self) -> Option<&Item> {
        self.last_saved.as_ref()
    }

    // =========================================================================
    // Derived
    // =========================================================================

    pub fn is_form_valid(&self) -> bool {
        self.form.is_complete() && self.form_errors.is_empty()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Items expiring between `today` and 30 days later, soonest first.
    pub fn expiring_items(&self, today: NaiveDate) -> Vec<Item> {
        expiring_within(&self.items, today, EXPIRY_WINDOW_DAYS)
    }

    /// [`expiring_items`](Self::expiring_items) for the clock's today.
    pub fn expiring_today(&self) -> Vec<Item> {
        self.expiring_items(self.clock.today())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Reload the list. On failure the previous list is kept.
    pub async fn fetch_items(&mut self) {
        self.loading = true;
        self.error = None;

        let span = subsystem_span!("fetch_items", subsystem = SUBSYSTEM);
        match self.gateway.get_all().instrument(span).await {
            Ok(items) => {
                debug!(count = items.len(), "Loaded items");
                self.items = items;
            }
            Err(e) => {
                log_call_event!(error, SUBSYSTEM, "Failed to fetch items", Action::Get, error = %e);
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Load one item into the form and enter edit mode.
    pub async fn fetch_item(&mut self, id: u64) {
        self.loading = true;
        self.error = None;
        self.editing_id = Some(id);

        let span = subsystem_span!("fetch_item", subsystem = SUBSYSTEM, id = id);
        match self.gateway.get_by_id(id).instrument(span).await {
            Ok(item) => self.form = ItemForm::from_item(&item),
            Err(e) => {
                log_call_event!(error, SUBSYSTEM, "Failed to fetch item", Action::Get, id = id, error = %e);
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Restore defaults and leave edit mode.
    pub fn reset_form(&mut self) {
        self.form = ItemForm::default();
        self.form_errors.clear();
        self.editing_id = None;
    }

    /// Re-run validation. Returns true when the form has no errors.
    pub fn validate_form(&mut self) -> bool {
        self.form_errors = self.form.validate();
        self.form_errors.is_empty()
    }

    /// Validate, then create or update.
    ///
    /// Returns true on success, after which the form is reset. Nothing is
    /// sent when validation fails.
    pub async fn submit_form(&mut self) -> bool {
        if !self.validate_form() {
            debug!(errors = self.form_errors.len(), "Form rejected by validation");
            return false;
        }

        self.submitting = true;
        self.error = None;

        let span = subsystem_span!(
            "submit_form",
            subsystem = SUBSYSTEM,
            editing_id = ?self.editing_id
        );
        // Any edited id takes the update path, including 0.
        let (action, result) = match self.editing_id {
            Some(id) => (
                Action::Put,
                self.gateway.update(&self.form.to_item(id)).instrument(span).await,
            ),
            None => (
                Action::Post,
                self.gateway.create(&self.form.to_new_item()).instrument(span).await,
            ),
        };

        let saved = match result {
            Ok(item) => {
                debug!(id = ?item.id, action = %action, "Item saved");
                self.last_saved = Some(item);
                self.reset_form();
                true
            }
            Err(e) => {
                log_call_event!(error, SUBSYSTEM, "Failed to submit item", action, error = %e);
                self.error = Some(e.to_string());
                false
            }
        };

        self.submitting = false;
        saved
    }
}
