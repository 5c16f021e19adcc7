//! sqlpeek
//!
//! Renders MyBatis-style dynamic SQL templates into literal SQL for preview.
//!
//! A template mixes SQL with `#{name}` / `${name}` placeholders and a small
//! set of markup blocks: `<if test="...">`, `<foreach>`, `<set>` and
//! `<where>`. Rendering evaluates the blocks against a parameter map and
//! splices values in as text.
//!
//! The output is a preview artifact. Values are substituted textually, not
//! bound, so the result is not safe to run against untrusted input.
//!
//! # Example
//!
//! ```
//! use sqlpeek::{Params, Template, extract_params, lint_rendered};
//!
//! let tpl = r#"SELECT * FROM users
//! <where>
//!   <if test="name != null">and name = #{name}</if>
//!   <if test="ids != null">and id IN <foreach item="ids">#{ids}</foreach></if>
//! </where>"#;
//!
//! assert_eq!(extract_params(tpl), vec!["name", "ids"]);
//!
//! let params = Params::new().with("ids", "1,2,3");
//! let sql = Template::parse(tpl).render(&params);
//! assert_eq!(sql, "SELECT * FROM users\nWHERE id IN (1,2,3)");
//! assert!(lint_rendered(&sql).is_ok());
//! ```

pub mod clauses;
pub mod cleanup;
pub mod condition;
pub mod error;
pub mod foreach;
pub mod lint;
#[cfg(feature = "tracing")]
mod log;
pub mod pipeline;
pub mod placeholder;
pub mod template;
pub mod value;

pub use cleanup::cleanup;
pub use condition::eval_condition;
pub use error::{PeekError, PeekResult};
pub use lint::{LintIssue, LintLevel, LintResult, StatementKind, detect_statement_kind, lint_rendered};
pub use pipeline::{apply_foreach_blocks, apply_if_blocks, apply_set_blocks, apply_where_blocks, render};
pub use placeholder::{extract_params, is_number, substitute};
pub use template::{BlockKind, MarkupIssue, MarkupIssueKind, Node, Passes, Template};
pub use value::{ParamValue, Params};
