//! Structured logging helpers.
//!
//! Every event carries a `subsystem` field so operator output and JSON logs
//! can be filtered per maintenance task:
//! - `subsystem`: `category-reorder`, `database-check`, `test-user-seeding`
//! - `category`: category name (renumbering events)
//! - `from_key` / `to_key`: key transition (renumbering events)

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    // Info level with subsystem
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Warn level with subsystem
    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Error level with subsystem
    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Debug level with subsystem
    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a category key transition with the standard fields.
#[macro_export]
macro_rules! log_category_event {
    ($level:ident, $subsystem:expr, $msg:expr, $category:expr, $from_key:expr, $to_key:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            category = %$category,
            from_key = $from_key,
            to_key = $to_key,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand_without_subscriber() {
        let name = "Akademik";
        crate::log_event!(info, "category-reorder", "starting", rows = 10);
        crate::log_event!(warn, "category-reorder", "no fields");
        crate::log_category_event!(info, "category-reorder", "staged", name, 2i64, 102i64);
        crate::log_category_event!(debug, "category-reorder", "committed", name, 102i64, 2i64, phase = "commit");
    }
}
