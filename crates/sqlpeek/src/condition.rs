//! `<if test="...">` condition evaluation.
//!
//! The grammar is deliberately tiny: clauses of the form `name != null`,
//! `name != ''` or `name != 0`, joined by the word `and`. There is no `or`.
//! Anything else is treated as true so the block is kept.

use std::sync::OnceLock;

use regex::Regex;

use crate::value::Params;

fn and_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\band\b").expect("invalid built-in and regex"))
}

fn clause_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\w+(?:\.\w+)*)\s*!=\s*(null|''|0)$").expect("invalid built-in clause regex")
    })
}

/// What a clause requires of its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// `!= null`
    NotNull,
    /// `!= ''`
    NotEmpty,
    /// `!= 0`
    NotZero,
}

/// One recognised `name != ...` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub name: String,
    pub check: Check,
}

impl Clause {
    /// Parse a single clause; `None` for shapes outside the grammar.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = clause_re().captures(s.trim())?;
        let check = match &caps[2] {
            "null" => Check::NotNull,
            "''" => Check::NotEmpty,
            _ => Check::NotZero,
        };
        Some(Clause {
            name: caps[1].to_string(),
            check,
        })
    }

    pub fn eval(&self, params: &Params) -> bool {
        let Some(value) = params.get(&self.name) else {
            return false;
        };
        match self.check {
            Check::NotNull | Check::NotEmpty => !value.is_blank(),
            Check::NotZero => value.to_text().trim() != "0",
        }
    }
}

/// Evaluate a test expression. All clauses must hold.
///
/// # Example
/// ```
/// use sqlpeek::{Params, eval_condition};
///
/// let params = Params::new().with("a", "1").with("b", "0");
/// assert!(eval_condition("a != null", &params));
/// assert!(!eval_condition("a != null and b != 0", &params));
/// ```
pub fn eval_condition(test: &str, params: &Params) -> bool {
    and_re()
        .split(test)
        .all(|part| Clause::parse(part).is_none_or(|clause| clause.eval(params)))
}
