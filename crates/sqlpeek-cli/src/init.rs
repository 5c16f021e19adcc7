use crate::cli::InitArgs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"version = "1"

[render]
lint = true            # flag DELETE/UPDATE without WHERE, leftover markup, ...
deny_warnings = false  # fail on warnings too
# params_file = "params.json"   # .json or .toml, relative to this file

# Default parameter values. Overridden by --params and --param.
[params]
# status = 1
# ids = "1,2,3"
# users = [{ id = 1, name = "ann" }, { id = 2, name = "bo" }]
"#;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)
}

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    std::fs::write(path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;

    println!("wrote {}", path.display());
    Ok(())
}
