//! Structured logging helpers.
//!
//! Every event carries a `subsystem` field so JSON output can be filtered by
//! component.

/// Log an event with a subsystem field.
#[macro_export]
macro_rules! log_event {
    ($level:ident, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a bridged call event with the standard call fields.
///
/// ```rust,ignore
/// log_call_event!(error, "ledger", "Failed to fetch items", "get", err = %e);
/// ```
#[macro_export]
macro_rules! log_call_event {
    ($level:ident, $subsystem:expr, $msg:expr, $action:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            action = %$action,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand_without_subscriber() {
        let id = 7u64;
        crate::log_event!(info, "ledger", "Loaded items", count = 3);
        crate::log_event!(debug, "ledger", "Nothing to report");
        crate::log_call_event!(warn, "ledger", "Item missing", "get", id = id);
        crate::log_call_event!(error, "cli", "Call failed", "post");
    }
}
