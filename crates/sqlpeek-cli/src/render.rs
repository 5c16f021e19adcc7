use crate::cli::RenderArgs;
use crate::config::{ProjectConfig, load_params_file};
use crate::input::read_template;
use sqlpeek::{LintLevel, Params, Template, lint_rendered};

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut params = Params::new();
    let mut lint = args.lint;
    let mut deny_warnings = args.deny_warnings;

    if args.config.exists() {
        let project = ProjectConfig::load(args.config.clone())?;
        tracing::debug!(
            target: "sqlpeek.cli",
            config = %project.config_path.display(),
            params = project.file.params.len(),
            "loaded config"
        );

        lint &= project.file.render.lint;
        deny_warnings |= project.file.render.deny_warnings;
        params.merge(project.file.params.clone());
        if let Some(p) = &project.file.render.params_file {
            params.merge(load_params_file(&project.resolve_path(p))?);
        }
    }

    if let Some(path) = &args.params_file {
        params.merge(load_params_file(path)?);
    }
    for assignment in &args.params {
        let (name, value) = Params::parse_assignment(assignment)?;
        params.insert(name, value);
    }

    let source = read_template(args.file.as_deref())?;
    if source.trim().is_empty() {
        anyhow::bail!("no template provided (pass a file or pipe SQL to stdin)");
    }
    let template = Template::parse(&source);

    let missing: Vec<String> = template
        .params()
        .into_iter()
        .filter(|name| params.get(name).is_none())
        .collect();
    if !missing.is_empty() {
        tracing::debug!(target: "sqlpeek.cli", ?missing, "placeholders without values render empty");
    }

    let mut had_error = false;
    let mut had_warning = false;

    for issue in template.issues() {
        eprintln!("warning: {issue}");
        had_warning = true;
    }

    let sql = template.render(&params);
    println!("{sql}");

    if lint {
        let result = lint_rendered(&sql);
        for issue in &result.issues {
            let level = match issue.level {
                LintLevel::Info => "info",
                LintLevel::Warning => "warning",
                LintLevel::Error => "error",
            };
            eprintln!("{level}[{}]: {}", issue.code, issue.message);
        }
        had_error |= result.has_errors();
        had_warning |= result.has_warnings();
    }

    if had_error || (deny_warnings && had_warning) {
        anyhow::bail!("render check failed");
    }

    Ok(())
}
