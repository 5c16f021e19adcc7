//! Helpers for render logs.

/// Longest SQL copy, in bytes, attached to a log event.
pub(crate) const MAX_LOGGED_SQL: usize = 200;

/// Truncate SQL for logging, cutting on a char boundary.
pub(crate) fn truncate_for_log(sql: &str) -> String {
    if sql.len() <= MAX_LOGGED_SQL {
        return sql.to_string();
    }
    let mut end = MAX_LOGGED_SQL;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &sql[..end])
}
