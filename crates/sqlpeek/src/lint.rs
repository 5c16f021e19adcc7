//! Text-level checks on rendered SQL.
//!
//! These run on the preview output, not on the template. They do not parse
//! SQL; they look at the leading keywords and a few whole-word searches,
//! which is enough to flag the statements worth a second look before they
//! are run by hand.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

// ── Lint codes ──────────────────────────────────────────────────────

/// DELETE without WHERE clause.
pub const LINT_E002: &str = "E002";
/// UPDATE without WHERE clause.
pub const LINT_E003: &str = "E003";
/// TRUNCATE warning.
pub const LINT_W001: &str = "W001";
/// DROP TABLE warning.
pub const LINT_W002: &str = "W002";
/// Markup left in the rendered output.
pub const LINT_W004: &str = "W004";
/// Nothing left after rendering.
pub const LINT_I002: &str = "I002";

fn where_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bwhere\b").expect("invalid built-in where regex"))
}

fn leftover_markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)</?(?:foreach|set|where)(?:\s[^>]*)?>").expect("invalid built-in markup regex")
    })
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)--[^\n]*|/\*.*?\*/").expect("invalid built-in comment regex"))
}

/// Type of SQL statement, by leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    AlterTable,
    DropTable,
    CreateIndex,
    DropIndex,
    Truncate,
    Begin,
    Commit,
    Rollback,
    With,
    Other,
}

/// Lint level for issues found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintLevel {
    /// Informational only.
    Info,
    /// Potential issue, but may be intentional.
    Warning,
    /// Likely a bug or dangerous operation.
    Error,
}

/// A lint issue found in rendered SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintIssue {
    pub level: LintLevel,
    pub code: &'static str,
    pub message: String,
}

impl LintIssue {
    fn new(level: LintLevel, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            code,
            message: message.into(),
        }
    }
}

/// Result of linting rendered SQL.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintResult {
    pub issues: Vec<LintIssue>,
}

impl LintResult {
    /// Returns true if there are no issues.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.level == LintLevel::Error)
    }

    /// Returns true if there are any warnings or errors.
    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.level == LintLevel::Warning || i.level == LintLevel::Error)
    }
}

/// Detect the type of SQL statement from its leading keywords.
///
/// Comments before the statement are skipped. Returns `None` for empty input.
///
/// # Example
/// ```
/// use sqlpeek::{detect_statement_kind, StatementKind};
///
/// assert_eq!(detect_statement_kind("select * from users"), Some(StatementKind::Select));
/// assert_eq!(detect_statement_kind("-- hi\nDELETE FROM users"), Some(StatementKind::Delete));
/// assert_eq!(detect_statement_kind("  "), None);
/// ```
pub fn detect_statement_kind(sql: &str) -> Option<StatementKind> {
    let stripped = comment_re().replace_all(sql, " ");
    let mut words = stripped
        .split(|c: char| c.is_whitespace() || c == '(' || c == ';')
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_uppercase);

    let first = words.next()?;
    let kind = match first.as_str() {
        "SELECT" | "VALUES" | "TABLE" => StatementKind::Select,
        "INSERT" => StatementKind::Insert,
        "UPDATE" => StatementKind::Update,
        "DELETE" => StatementKind::Delete,
        "TRUNCATE" => StatementKind::Truncate,
        "BEGIN" | "START" => StatementKind::Begin,
        "COMMIT" | "END" => StatementKind::Commit,
        "ROLLBACK" => StatementKind::Rollback,
        "WITH" => StatementKind::With,
        "CREATE" | "ALTER" | "DROP" => {
            let target = words
                .find(|w| !matches!(w.as_str(), "UNIQUE" | "TEMP" | "TEMPORARY" | "OR" | "REPLACE"))
                .unwrap_or_default();
            match (first.as_str(), target.as_str()) {
                ("CREATE", "TABLE") => StatementKind::CreateTable,
                ("CREATE", "INDEX") => StatementKind::CreateIndex,
                ("ALTER", "TABLE") => StatementKind::AlterTable,
                ("DROP", "TABLE") => StatementKind::DropTable,
                ("DROP", "INDEX") => StatementKind::DropIndex,
                _ => StatementKind::Other,
            }
        }
        _ => StatementKind::Other,
    };
    Some(kind)
}

/// Lint a rendered statement.
///
/// # Example
/// ```
/// use sqlpeek::lint_rendered;
///
/// assert!(lint_rendered("DELETE FROM users").has_errors());
/// assert!(lint_rendered("DELETE FROM users WHERE id = 1").is_ok());
/// ```
pub fn lint_rendered(sql: &str) -> LintResult {
    let mut result = LintResult::default();

    let Some(kind) = detect_statement_kind(sql) else {
        result
            .issues
            .push(LintIssue::new(LintLevel::Info, LINT_I002, "rendered SQL is empty"));
        return result;
    };

    let has_where = where_re().is_match(sql);
    match kind {
        StatementKind::Delete if !has_where => result.issues.push(LintIssue::new(
            LintLevel::Error,
            LINT_E002,
            "DELETE without WHERE clause will delete all rows",
        )),
        StatementKind::Update if !has_where => result.issues.push(LintIssue::new(
            LintLevel::Error,
            LINT_E003,
            "UPDATE without WHERE clause will update all rows",
        )),
        StatementKind::Truncate => result.issues.push(LintIssue::new(
            LintLevel::Warning,
            LINT_W001,
            "TRUNCATE will delete all rows",
        )),
        StatementKind::DropTable => result.issues.push(LintIssue::new(
            LintLevel::Warning,
            LINT_W002,
            "DROP TABLE is irreversible",
        )),
        _ => {}
    }

    if let Some(m) = leftover_markup_re().find(sql) {
        result.issues.push(LintIssue::new(
            LintLevel::Warning,
            LINT_W004,
            format!("unprocessed markup {} left in SQL", m.as_str()),
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kinds() {
        let cases = [
            ("SELECT 1", StatementKind::Select),
            ("(select 1)", StatementKind::Select),
            ("insert into t values (1)", StatementKind::Insert),
            ("UPDATE t SET a = 1", StatementKind::Update),
            ("/* x */ delete from t", StatementKind::Delete),
            ("WITH x AS (SELECT 1) SELECT * FROM x", StatementKind::With),
            ("CREATE TABLE t (id int)", StatementKind::CreateTable),
            ("create unique index i on t (a)", StatementKind::CreateIndex),
            ("ALTER TABLE t ADD c int", StatementKind::AlterTable),
            ("DROP TABLE t", StatementKind::DropTable),
            ("drop index i", StatementKind::DropIndex),
            ("TRUNCATE t", StatementKind::Truncate),
            ("BEGIN", StatementKind::Begin),
            ("COMMIT", StatementKind::Commit),
            ("ROLLBACK", StatementKind::Rollback),
            ("EXPLAIN SELECT 1", StatementKind::Other),
        ];
        for (sql, kind) in cases {
            assert_eq!(detect_statement_kind(sql), Some(kind), "{sql}");
        }
    }

    #[test]
    fn delete_and_update_need_where() {
        let r = lint_rendered("DELETE FROM users");
        assert!(r.has_errors());
        assert_eq!(r.issues[0].code, LINT_E002);

        let r = lint_rendered("update users\nSET\nname = 'a'");
        assert_eq!(r.issues[0].code, LINT_E003);

        assert!(lint_rendered("UPDATE users SET a = 1 WHERE id = 2").is_ok());
        assert!(lint_rendered("delete from users where id = 2").is_ok());
    }

    #[test]
    fn where_must_be_a_whole_word() {
        assert!(lint_rendered("DELETE FROM somewhere").has_errors());
    }

    #[test]
    fn warns_on_destructive_ddl() {
        let r = lint_rendered("TRUNCATE users");
        assert!(r.has_warnings());
        assert!(!r.has_errors());
        assert_eq!(r.issues[0].code, LINT_W001);
        assert_eq!(lint_rendered("DROP TABLE users").issues[0].code, LINT_W002);
    }

    #[test]
    fn flags_leftover_markup() {
        let r = lint_rendered(r#"SELECT * FROM t WHERE id IN <foreach collection="ids">#{id}</foreach>"#);
        assert_eq!(r.issues.len(), 1);
        assert_eq!(r.issues[0].code, LINT_W004);
        assert!(r.issues[0].message.contains("<foreach"));
        assert!(lint_rendered("SELECT '<settings>' FROM t").is_ok());
    }

    #[test]
    fn empty_statement_is_info() {
        let r = lint_rendered("  ");
        assert_eq!(r.issues[0].level, LintLevel::Info);
        assert!(!r.has_warnings());
    }
}
