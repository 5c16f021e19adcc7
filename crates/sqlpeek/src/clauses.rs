//! `<set>` and `<where>` body normalizers. Pure text repair.

use std::sync::OnceLock;

use regex::Regex;

fn leading_connective_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:and|or)\b\s*").expect("invalid built-in where regex"))
}

/// Rewrite a `<set>` body as a `SET` clause.
///
/// Blank lines are dropped, every remaining line ends with exactly one
/// trailing comma except the last, which has none.
///
/// # Example
/// ```
/// use sqlpeek::clauses::repair_set_body;
///
/// assert_eq!(
///     repair_set_body("\n  name = #{name}\n  age = #{age},\n"),
///     "SET\nname = #{name},\nage = #{age}"
/// );
/// ```
pub fn repair_set_body(body: &str) -> String {
    let lines: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let last = lines.len().saturating_sub(1);
    let cleaned: Vec<String> = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == last {
                line.strip_suffix(',').unwrap_or(line).to_string()
            } else if line.ends_with(',') {
                line.to_string()
            } else {
                format!("{line},")
            }
        })
        .collect();

    format!("SET\n{}", cleaned.join("\n"))
}

/// Rewrite a `<where>` body as a `WHERE` clause, or nothing if it is empty.
///
/// A leading `and`/`or` (any case, whole word) is dropped.
pub fn normalize_where_body(body: &str) -> String {
    let body = body.trim();
    let body = leading_connective_re().replace(body, "");
    if body.is_empty() {
        String::new()
    } else {
        format!("WHERE {body}")
    }
}
