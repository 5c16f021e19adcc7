use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlpeek::{Params, Template};

/// Build a search template with `n` optional predicates and one IN list:
/// SELECT * FROM t <where><if test="c0 != null">and c0 = #{c0}</if>...</where>
fn build_template(n: usize) -> String {
    let mut sql = String::from("SELECT * FROM t\n<where>\n");
    for i in 0..n {
        sql.push_str(&format!(
            "  <if test=\"c{i} != null\">and c{i} = #{{c{i}}}</if>\n"
        ));
    }
    sql.push_str("  <if test=\"ids != null\">and id IN <foreach item=\"ids\">#{ids}</foreach></if>\n");
    sql.push_str("</where>");
    sql
}

fn build_params(n: usize) -> Params {
    let mut params = Params::new();
    for i in (0..n).step_by(2) {
        params.insert(format!("c{i}"), i as i64);
    }
    params.insert("ids", "1,2,3,4,5,6,7,8");
    params
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("template/parse");

    for n in [1, 5, 10, 50, 100] {
        let src = build_template(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &src, |b, src| {
            b.iter(|| black_box(Template::parse(src)));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("template/render");

    for n in [1, 5, 10, 50, 100] {
        let template = Template::parse(&build_template(n));
        let params = build_params(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(template.render(&params)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
