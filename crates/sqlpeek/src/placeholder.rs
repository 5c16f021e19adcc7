//! `#{name}` / `${name}` placeholders: extraction, quoting, substitution.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::value::{ParamValue, Params};

/// Matches `#{name}` or `${name}` where `name` is `word(.word)*`.
pub const PARAM_PATTERN: &str = r"([#$])\{(\w+(?:\.\w+)*)\}";

fn param_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PARAM_PATTERN).expect("invalid built-in placeholder regex"))
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("invalid built-in number regex"))
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w+(?:\.\w+)*$").expect("invalid built-in name regex"))
}

/// How a placeholder emits its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderForm {
    /// `#{name}`: numbers bare, everything else single-quoted.
    Quoted,
    /// `${name}`: the value verbatim.
    Raw,
}

impl PlaceholderForm {
    fn from_sigil(sigil: &str) -> Self {
        if sigil == "$" {
            PlaceholderForm::Raw
        } else {
            PlaceholderForm::Quoted
        }
    }

    /// Format a non-blank value's text for this form.
    pub fn emit(self, text: &str) -> String {
        match self {
            PlaceholderForm::Raw => text.to_string(),
            PlaceholderForm::Quoted if is_number(text) => text.to_string(),
            PlaceholderForm::Quoted => format!("'{text}'"),
        }
    }
}

/// Returns `true` for `-?digits(.digits)?`, the values `#{}` leaves unquoted.
pub fn is_number(s: &str) -> bool {
    number_re().is_match(s)
}

/// Returns `true` if `s` is usable as a placeholder name (`word(.word)*`).
pub fn is_param_name(s: &str) -> bool {
    name_re().is_match(s)
}

/// Distinct placeholder names in order of first appearance.
///
/// `#{}` and `${}` contribute to the same set.
///
/// # Example
/// ```
/// use sqlpeek::extract_params;
///
/// let names = extract_params("SELECT * FROM t WHERE a = #{a} AND b = ${b} OR a = #{a}");
/// assert_eq!(names, vec!["a", "b"]);
/// ```
pub fn extract_params(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for caps in param_re().captures_iter(template) {
        let Some(name) = caps.get(2).map(|m| m.as_str()) else {
            continue;
        };
        if seen.insert(name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Replace every placeholder with its value from `params`.
///
/// Absent or blank values become the empty string. Values are inserted in a
/// single scan, so a value that itself looks like a placeholder stays as is.
pub fn substitute(template: &str, params: &Params) -> String {
    param_re()
        .replace_all(template, |caps: &Captures<'_>| {
            let form = PlaceholderForm::from_sigil(&caps[1]);
            match params.get(&caps[2]) {
                Some(value) if !value.is_blank() => form.emit(&value.to_text()),
                _ => String::new(),
            }
        })
        .into_owned()
}

/// Marks a sigil inside an already-final value so later scans skip it.
const SEAL: char = '\u{E000}';

/// Break up `#{` / `${` in a value so [`substitute`] cannot match it.
fn seal(text: String) -> String {
    if !text.contains('{') {
        return text;
    }
    text.replace("#{", "#\u{E000}{").replace("${", "$\u{E000}{")
}

/// Undo [`seal`] once substitution has run.
pub(crate) fn unseal(sql: &str) -> String {
    sql.replace(SEAL, "")
}

/// Bind one `<foreach>` element into a rendered body fragment.
///
/// `#{item}` takes the element itself and `#{item.field}` a field of a
/// record element. With `resolve` unset, placeholders naming anything else
/// are left for the final substitution. With `resolve` set they are filled
/// from those params in the same scan, and every inserted value is sealed
/// so the fragment comes out final.
pub(crate) fn bind_item(
    fragment: &str,
    item: &str,
    element: &ParamValue,
    resolve: Option<&Params>,
) -> String {
    param_re()
        .replace_all(fragment, |caps: &Captures<'_>| {
            let name = &caps[2];
            let form = PlaceholderForm::from_sigil(&caps[1]);
            let bound = if name == item {
                Some(element)
            } else {
                name.strip_prefix(item)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .and_then(|field| element.field(field))
            };
            match (bound, resolve) {
                (Some(value), None) => form.emit(&value.to_text()),
                (Some(value), Some(_)) => seal(form.emit(&value.to_text())),
                (None, None) => caps[0].to_string(),
                (None, Some(params)) => match params.get(name) {
                    Some(value) if !value.is_blank() => seal(form.emit(&value.to_text())),
                    _ => String::new(),
                },
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_distinct_names_in_order() {
        let sql = "UPDATE t SET a = #{a}, b = ${b.c} WHERE id = #{id} AND a = ${a}";
        assert_eq!(extract_params(sql), vec!["a", "b.c", "id"]);
    }

    #[test]
    fn extract_from_empty_template() {
        assert!(extract_params("").is_empty());
        assert!(extract_params("SELECT 1").is_empty());
    }

    #[test]
    fn extract_ignores_malformed_placeholders() {
        assert!(extract_params("#{} ${a.} #{ a } {b}").is_empty());
    }

    #[test]
    fn number_pattern() {
        for s in ["0", "42", "-7", "3.14", "-0.5"] {
            assert!(is_number(s), "{s}");
        }
        for s in ["", "1.", ".5", "1e5", "+1", " 1", "abc", "1,2"] {
            assert!(!is_number(s), "{s}");
        }
    }

    #[test]
    fn quoted_and_raw_forms() {
        let params = Params::new().with("n", 10).with("s", "bob").with("f", "-1.5");
        assert_eq!(
            substitute("#{n} ${n} #{s} ${s} #{f}", &params),
            "10 10 'bob' bob -1.5"
        );
    }

    #[test]
    fn blank_and_absent_become_empty() {
        let params = Params::new().with("blank", "  ").with("null", ParamValue::Null);
        assert_eq!(substitute("[#{blank}][${null}][#{missing}]", &params), "[][][]");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let params = Params::new().with("a", "#{b}").with("b", "x");
        assert_eq!(substitute("${a}", &params), "#{b}");
    }

    #[test]
    fn bind_item_scalar_and_fields() {
        let user = ParamValue::record([("id", ParamValue::from(7)), ("name", "ann".into())]);
        assert_eq!(
            bind_item("(#{u.id}, #{u.name}, ${u.name}, #{other})", "u", &user, None),
            "(7, 'ann', ann, #{other})"
        );
        assert_eq!(bind_item("#{id}", "id", &ParamValue::from("x"), None), "'x'");
        assert_eq!(
            bind_item("#{id.missing}", "id", &ParamValue::from("x"), None),
            "#{id.missing}"
        );
        assert_eq!(bind_item("#{idx}", "id", &ParamValue::from(1), None), "#{idx}");
    }

    #[test]
    fn resolved_fragments_are_final() {
        let params = Params::new().with("other", "${secret}").with("secret", "x");
        let element = ParamValue::from("#{secret}");
        let bound = bind_item("${id} ${other} #{gone}", "id", &element, Some(&params));
        assert_eq!(substitute(&bound, &params), bound);
        assert_eq!(unseal(&bound), "#{secret} ${secret} ");
    }
}
