//! `<foreach>` attributes, list coercion, and expansion.
//!
//! The element list is looked up by the `item` name itself; a `collection`
//! attribute is accepted but ignored. This lets a prompt ask for `ids` once
//! and have `<foreach item="ids">#{ids}</foreach>` iterate over it.

use std::sync::OnceLock;

use regex::Regex;

use crate::placeholder::bind_item;
use crate::value::{ParamValue, Params};

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(\w+)\s*=\s*"([^"]*)""#).expect("invalid built-in attribute regex"))
}

/// Parsed `<foreach ...>` attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeachAttrs {
    /// Element variable and parameter lookup key. `None` when missing or empty.
    pub item: Option<String>,
    pub open: String,
    pub separator: String,
    pub close: String,
}

impl Default for ForeachAttrs {
    fn default() -> Self {
        Self {
            item: None,
            open: "(".to_string(),
            separator: ",".to_string(),
            close: ")".to_string(),
        }
    }
}

impl ForeachAttrs {
    /// Parse the attribute text between `<foreach` and `>`.
    ///
    /// The first occurrence of an attribute wins; unknown attributes are ignored.
    pub fn parse(attrs: &str) -> Self {
        let mut out = Self::default();
        let mut seen: Vec<&str> = Vec::new();
        for caps in attr_re().captures_iter(attrs) {
            let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let name = name.as_str();
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            let value = value.as_str().to_string();
            match name {
                "item" if !value.is_empty() => out.item = Some(value),
                "open" => out.open = value,
                "separator" => out.separator = value,
                "close" => out.close = value,
                _ => {}
            }
        }
        out
    }
}

/// Coerce a parameter value into the elements a `<foreach>` iterates.
///
/// - absent, null, or blank text: no elements
/// - a list: its elements
/// - text containing `,`: the trimmed segments, minus trailing empty ones
/// - anything else: one element
pub fn coerce_list(value: Option<&ParamValue>) -> Vec<ParamValue> {
    match value {
        None | Some(ParamValue::Null) => Vec::new(),
        Some(ParamValue::List(items)) => items.clone(),
        Some(ParamValue::Text(s)) => split_csv(s),
        Some(other) => vec![other.clone()],
    }
}

fn split_csv(s: &str) -> Vec<ParamValue> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }
    if !s.contains(',') {
        return vec![ParamValue::Text(s.to_string())];
    }
    let mut parts: Vec<&str> = s.split(',').map(str::trim).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
        .into_iter()
        .map(|p| ParamValue::Text(p.to_string()))
        .collect()
}

/// Expand an already-rendered body once per element and wrap the result.
///
/// An empty list still yields `open + close`. With `resolve` set, the
/// fragments are fully substituted and sealed (see [`bind_item`]).
pub(crate) fn expand(
    attrs: &ForeachAttrs,
    item: &str,
    body: &str,
    elements: &[ParamValue],
    resolve: Option<&Params>,
) -> String {
    let fragments: Vec<String> = elements
        .iter()
        .map(|element| {
            bind_item(body, item, &text_element(element), resolve)
                .trim()
                .to_string()
        })
        .collect();
    format!("{}{}{}", attrs.open, fragments.join(&attrs.separator), attrs.close)
}

/// Scalar elements bind by their trimmed text; records keep their fields.
fn text_element(element: &ParamValue) -> ParamValue {
    match element {
        ParamValue::Record(_) => element.clone(),
        other => ParamValue::Text(other.to_text().trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_with_defaults() {
        let attrs = ForeachAttrs::parse(r#"collection="list" item="id""#);
        assert_eq!(attrs.item.as_deref(), Some("id"));
        assert_eq!(attrs.open, "(");
        assert_eq!(attrs.separator, ",");
        assert_eq!(attrs.close, ")");

        let attrs = ForeachAttrs::parse(r#"item="u" open="VALUES " separator=" , " close="""#);
        assert_eq!(attrs.open, "VALUES ");
        assert_eq!(attrs.separator, " , ");
        assert_eq!(attrs.close, "");
    }

    #[test]
    fn empty_or_missing_item() {
        assert_eq!(ForeachAttrs::parse(r#"collection="ids""#).item, None);
        assert_eq!(ForeachAttrs::parse(r#"item="""#).item, None);
    }

    #[test]
    fn first_attribute_wins() {
        let attrs = ForeachAttrs::parse(r#"item="a" item="b""#);
        assert_eq!(attrs.item.as_deref(), Some("a"));
    }

    #[test]
    fn coerces_text() {
        assert!(coerce_list(None).is_empty());
        assert!(coerce_list(Some(&ParamValue::from("  "))).is_empty());
        assert_eq!(coerce_list(Some(&ParamValue::from(" 7 "))), vec![ParamValue::from("7")]);
        assert_eq!(
            coerce_list(Some(&ParamValue::from("1, 2 ,3,"))),
            vec![ParamValue::from("1"), ParamValue::from("2"), ParamValue::from("3")]
        );
        assert_eq!(
            coerce_list(Some(&ParamValue::from("a,,b"))),
            vec![ParamValue::from("a"), ParamValue::from(""), ParamValue::from("b")]
        );
    }

    #[test]
    fn coerces_lists_and_scalars() {
        let list = ParamValue::from(vec![1, 2]);
        assert_eq!(coerce_list(Some(&list)).len(), 2);
        assert_eq!(coerce_list(Some(&ParamValue::from(9))), vec![ParamValue::Int(9)]);
    }

    #[test]
    fn expands_with_quoting() {
        let attrs = ForeachAttrs::parse(r#"item="v""#);
        let elements = coerce_list(Some(&ParamValue::from("1,a")));
        assert_eq!(expand(&attrs, "v", " #{v} ", &elements, None), "(1,'a')");
        assert_eq!(expand(&attrs, "v", "#{v}", &[], None), "()");
    }

    #[test]
    fn expands_record_fields() {
        let attrs = ForeachAttrs::parse(r#"item="u" open="" close="" separator=", ""#);
        let users = vec![
            ParamValue::record([("id", ParamValue::from(1)), ("name", "a".into())]),
            ParamValue::record([("id", ParamValue::from(2)), ("name", "b".into())]),
        ];
        assert_eq!(
            expand(&attrs, "u", "(#{u.id}, #{u.name})", &users, None),
            "(1, 'a'), (2, 'b')"
        );
    }

    #[test]
    fn null_elements_render_as_blank_text() {
        let attrs = ForeachAttrs::default();
        let elements = vec![ParamValue::Null, ParamValue::from(3)];
        assert_eq!(expand(&attrs, "x", "#{x}", &elements, None), "('',3)");
        assert_eq!(expand(&attrs, "x", "${x}", &elements, None), "(,3)");
    }
}
