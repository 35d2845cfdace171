//! Item form fields and their validation rules.

use crate::domain::item::{date_part, Item, NewItem, DEFAULT_WARRANTY_PERIOD};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Validated form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    BuyDate,
    WarrantyPeriod,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BuyDate => "buy_date",
            Self::WarrantyPeriod => "warranty_period",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation messages. Empty means valid.
pub type FieldErrors = BTreeMap<FormField, String>;

pub const NAME_REQUIRED: &str = "name must not be empty";
pub const BUY_DATE_REQUIRED: &str = "buy date must not be empty";
pub const WARRANTY_PERIOD_POSITIVE: &str = "warranty period must be greater than 0 days";

/// Editable item fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemForm {
    pub name: String,
    pub buy_date: String,
    pub warranty_period: u32,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            buy_date: String::new(),
            warranty_period: DEFAULT_WARRANTY_PERIOD,
        }
    }
}

impl ItemForm {
    /// Load an item into a form; a timestamp `buy_date` keeps its date part.
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            buy_date: date_part(&item.buy_date).to_string(),
            warranty_period: item.warranty_period,
        }
    }

    /// Check every rule and collect the failures.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert(FormField::Name, NAME_REQUIRED.to_string());
        }
        if self.buy_date.is_empty() {
            errors.insert(FormField::BuyDate, BUY_DATE_REQUIRED.to_string());
        }
        if self.warranty_period == 0 {
            errors.insert(
                FormField::WarrantyPeriod,
                WARRANTY_PERIOD_POSITIVE.to_string(),
            );
        }
        errors
    }

    /// Whether the fields alone would pass validation.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.buy_date.is_empty() && self.warranty_period > 0
    }

    pub fn to_new_item(&self) -> NewItem {
        NewItem::new(self.name.clone(), self.buy_date.clone(), self.warranty_period)
    }

    pub fn to_item(&self, id: u64) -> Item {
        self.to_new_item().with_id(id)
    }
}
