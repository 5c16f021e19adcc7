use serde::Deserialize;
use sqlpeek::Params;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let config_dir = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self {
            config_path,
            config_dir,
            file,
        })
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub params: Params,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_true")]
    pub lint: bool,
    #[serde(default)]
    pub deny_warnings: bool,
    /// Extra parameter document, relative to the config file.
    pub params_file: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lint: true,
            deny_warnings: false,
            params_file: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version != "1" {
            anyhow::bail!("unsupported config version: {} (expected \"1\")", self.version);
        }
        Ok(())
    }
}

/// Load a parameter document, picking the format from the extension.
pub fn load_params_file(path: &Path) -> anyhow::Result<Params> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read params file {}: {e}", path.display()))?;

    let params = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Params::from_json_str(&raw),
        Some("toml") => Params::from_toml_str(&raw),
        _ => anyhow::bail!(
            "unsupported params file {} (expected .json or .toml)",
            path.display()
        ),
    };
    params.map_err(|e| anyhow::anyhow!("failed to load params file {}: {e}", path.display()))
}
