//! End-to-end render behaviour through the public API.

use sqlpeek::{
    ParamValue, Params, Template, apply_foreach_blocks, apply_if_blocks, apply_set_blocks,
    apply_where_blocks, extract_params, lint_rendered, render, substitute,
};

const SEARCH: &str = r#"SELECT * FROM t <where><if test="id != null">and id = #{id}</if></where>"#;

#[test]
fn where_with_if_end_to_end() {
    assert_eq!(
        render(SEARCH, &Params::new().with("id", "5")),
        "SELECT * FROM t WHERE id = 5"
    );
    assert_eq!(render(SEARCH, &Params::new()), "SELECT * FROM t");
    assert_eq!(render(SEARCH, &Params::new().with("id", "  ")), "SELECT * FROM t");
}

#[test]
fn render_is_deterministic() {
    let params = Params::new().with("id", "abc");
    let first = render(SEARCH, &params);
    for _ in 0..10 {
        assert_eq!(render(SEARCH, &params), first);
    }
    assert_eq!(first, "SELECT * FROM t WHERE id = 'abc'");
}

#[test]
fn extraction_without_markup() {
    let sql = "SELECT ${cols} FROM t WHERE a = #{a} AND b = #{b} AND c = #{a}";
    assert_eq!(extract_params(sql), vec!["cols", "a", "b"]);
}

#[test]
fn quoting_law() {
    let cases = [
        ("42", "42"),
        ("-3", "-3"),
        ("2.50", "2.50"),
        ("1e3", "'1e3'"),
        ("007x", "'007x'"),
        ("O'Brien", "'O'Brien'"),
    ];
    for (value, expected) in cases {
        let params = Params::new().with("v", value);
        assert_eq!(substitute("#{v}", &params), expected, "{value}");
        assert_eq!(substitute("${v}", &params), value, "{value}");
    }
}

#[test]
fn blank_value_law() {
    let tpl = "a=#{x} b=${x} c=#{y}";
    for params in [
        Params::new(),
        Params::new().with("x", "").with("y", "   "),
        Params::new().with("x", ParamValue::Null).with("y", "\t"),
    ] {
        assert_eq!(render(tpl, &params), "a= b= c=");
    }
}

#[test]
fn where_normalization() {
    assert_eq!(apply_where_blocks("<where>status = 1</where>"), "WHERE status = 1");
    assert_eq!(apply_where_blocks("<where>and status = 1</where>"), "WHERE status = 1");
    assert_eq!(apply_where_blocks("<where></where>"), "");
}

#[test]
fn if_and_semantics() {
    let tpl = r#"<if test="a != null and b != 0">X</if>"#;
    assert_eq!(apply_if_blocks(tpl, &Params::new().with("a", "1").with("b", "0")), "");
    assert_eq!(apply_if_blocks(tpl, &Params::new().with("a", "1").with("b", "2")), "X");
}

#[test]
fn foreach_csv_and_empty() {
    let tpl = r#"<foreach item="id" open="(" separator="," close=")">#{id}</foreach>"#;
    assert_eq!(apply_foreach_blocks(tpl, &Params::new().with("id", "1,2,3")), "(1,2,3)");
    assert_eq!(apply_foreach_blocks(tpl, &Params::new().with("id", "")), "()");
    assert_eq!(apply_foreach_blocks(tpl, &Params::new()), "()");
}

#[test]
fn foreach_quotes_text_elements() {
    let tpl = r#"name IN <foreach item="names">#{names}</foreach>"#;
    assert_eq!(
        render(tpl, &Params::new().with("names", "ann, bo")),
        "name IN ('ann','bo')"
    );
    assert_eq!(
        render(tpl, &Params::new().with("names", vec!["x"])),
        "name IN ('x')"
    );
}

#[test]
fn set_comma_repair() {
    let tpl = "<set>\nname = #{name}\nage = #{age},\n</set>";
    assert_eq!(apply_set_blocks(tpl), "SET\nname = #{name},\nage = #{age}");
}

#[test]
fn update_with_conditional_set() {
    let tpl = r#"UPDATE users
<set>
  <if test="name != null">name = #{name},</if>
  <if test="age != null">age = #{age},</if>
</set>
WHERE id = #{id}"#;
    let params = Params::from_pairs([("name", "ann"), ("age", ""), ("id", "9")]);
    let sql = render(tpl, &params);
    assert_eq!(sql, "UPDATE users\nSET\nname = 'ann'\nWHERE id = 9");
    assert!(lint_rendered(&sql).is_ok());
}

#[test]
fn update_without_where_is_flagged() {
    let tpl = r#"UPDATE users <set>name = #{name}</set> <where><if test="id != null">id = #{id}</if></where>"#;
    let sql = render(tpl, &Params::new().with("name", "x"));
    assert_eq!(sql, "UPDATE users SET\nname = 'x'");
    assert!(lint_rendered(&sql).has_errors());
}

#[test]
fn malformed_markup_survives_as_text() {
    let tpl = r#"SELECT * FROM t WHERE id IN <foreach collection="ids">#{ids}</foreach>"#;
    let t = Template::parse(tpl);
    assert_eq!(t.issues().len(), 1);
    let sql = t.render(&Params::new().with("ids", "1"));
    assert_eq!(
        sql,
        r#"SELECT * FROM t WHERE id IN <foreach collection="ids">1</foreach>"#
    );
    assert!(lint_rendered(&sql).has_warnings());
}

#[test]
fn params_from_documents_drive_render() {
    let params = Params::from_json_str(r#"{"ids": [3, 4], "status": "on"}"#).unwrap();
    let tpl = r#"SELECT * FROM t WHERE id IN <foreach item="ids">#{ids}</foreach> AND status = #{status}"#;
    assert_eq!(
        render(tpl, &params),
        "SELECT * FROM t WHERE id IN (3,4) AND status = 'on'"
    );
}

#[test]
fn values_are_never_rescanned_inside_or_outside_foreach() {
    let params = Params::new()
        .with("ids", "${secret}")
        .with("a", "${secret}")
        .with("secret", "x");
    assert_eq!(render("${a}", &params), "${secret}");
    assert_eq!(
        render(r#"<foreach item="ids">${ids}</foreach>"#, &params),
        "(${secret})"
    );
    assert_eq!(
        render(r#"<foreach item="ids">#{ids} = ${a}</foreach>"#, &params),
        "('${secret}' = ${secret})"
    );
}
