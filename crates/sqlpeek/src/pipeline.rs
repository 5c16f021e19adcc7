//! One function per render step, plus the full pipeline.
//!
//! Each step parses the template and expands a single block kind, copying
//! every other block through untouched. [`render`] runs them all in order:
//! `<if>`, `<foreach>`, `<set>`, `<where>`, substitution, cleanup.

use crate::template::{Passes, Template};
use crate::value::Params;

/// Keep the body of every `<if>` whose test holds, drop the rest.
pub fn apply_if_blocks(template: &str, params: &Params) -> String {
    Template::parse(template).render_with(params, Passes::IF)
}

/// Expand every `<foreach>` over the parameter named by its `item`.
pub fn apply_foreach_blocks(template: &str, params: &Params) -> String {
    Template::parse(template).render_with(params, Passes::FOREACH)
}

/// Turn every `<set>` block into a comma-repaired `SET` clause.
pub fn apply_set_blocks(template: &str) -> String {
    Template::parse(template).render_with(&Params::new(), Passes::SET)
}

/// Turn every `<where>` block into a `WHERE` clause, or drop it if empty.
pub fn apply_where_blocks(template: &str) -> String {
    Template::parse(template).render_with(&Params::new(), Passes::WHERE)
}

/// Render a template into literal SQL.
///
/// # Example
/// ```
/// use sqlpeek::{Params, render};
///
/// let tpl = r#"SELECT * FROM t <where><if test="id != null">and id = #{id}</if></where>"#;
/// assert_eq!(render(tpl, &Params::new().with("id", "5")), "SELECT * FROM t WHERE id = 5");
/// assert_eq!(render(tpl, &Params::new()), "SELECT * FROM t");
/// ```
pub fn render(template: &str, params: &Params) -> String {
    Template::parse(template).render(params)
}
