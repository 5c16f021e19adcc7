use std::io::Read;
use std::path::Path;

/// Read a template from `file`, or from stdin when there is none.
pub fn read_template(file: Option<&Path>) -> anyhow::Result<String> {
    let source = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
            buf
        }
    };
    Ok(source)
}
