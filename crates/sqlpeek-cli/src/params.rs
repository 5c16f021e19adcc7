use crate::cli::ParamsArgs;
use crate::input::read_template;

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let source = read_template(args.file.as_deref())?;
    print!("{}", param_listing(&source));
    Ok(())
}

/// One placeholder name per line. Blank templates list nothing.
fn param_listing(source: &str) -> String {
    sqlpeek::extract_params(source)
        .into_iter()
        .map(|name| format!("{name}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_names_in_first_seen_order() {
        assert_eq!(
            param_listing("SELECT * FROM t WHERE a = #{a} AND b = ${b} OR c = #{a}"),
            "a\nb\n"
        );
    }

    #[test]
    fn blank_template_lists_nothing() {
        assert_eq!(param_listing(""), "");
        assert_eq!(param_listing("  \n\t"), "");
    }
}
