//! Final whitespace and stray-tag cleanup.

use std::sync::OnceLock;

use regex::Regex;

fn stray_if_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?if\b[^>]*>").expect("invalid built-in if tag regex"))
}

fn blanks_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\t ]+").expect("invalid built-in whitespace regex"))
}

fn newlines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\r?\n){2,}").expect("invalid built-in newline regex"))
}

/// Strip leftover `<if>`/`</if>` markers, squeeze runs of spaces and tabs to
/// one space, squeeze blank-line runs to one newline, and trim.
///
/// Text between stray markers is kept.
pub fn cleanup(sql: &str) -> String {
    let sql = stray_if_re().replace_all(sql, "");
    let sql = blanks_re().replace_all(&sql, " ");
    let sql = newlines_re().replace_all(&sql, "\n");
    sql.trim().to_string()
}
