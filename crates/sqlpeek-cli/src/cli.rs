use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Params,
    Render,
    Init,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Params(ParamsArgs),
    Render(RenderArgs),
    Init(InitArgs),
}

#[derive(Debug, Clone)]
pub struct ParamsArgs {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub config: PathBuf,
    pub file: Option<PathBuf>,
    /// Raw `name=value` assignments, in command line order.
    pub params: Vec<String>,
    pub params_file: Option<PathBuf>,
    pub lint: bool,
    pub deny_warnings: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

pub const DEFAULT_CONFIG: &str = "sqlpeek.toml";

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "params" => parse_params(it.map(|s| s.as_str())),
        "render" => parse_render(it.map(|s| s.as_str())),
        "init" => parse_init(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_params<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut file: Option<PathBuf> = None;

    for token in it {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Params)),
            _ if token.starts_with("--") => anyhow::bail!("unknown argument: {token}"),
            _ if file.is_none() => file = Some(PathBuf::from(token)),
            other => anyhow::bail!("unexpected extra file: {other}"),
        }
    }

    Ok(Command::Params(ParamsArgs { file }))
}

fn parse_render<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut file: Option<PathBuf> = None;
    let mut params: Vec<String> = Vec::new();
    let mut params_file: Option<PathBuf> = None;
    let mut lint = true;
    let mut deny_warnings = false;
    let mut verbose = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Render)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--param" | "-p" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--param requires a value");
                };
                params.push(v.to_string());
            }
            _ if token.starts_with("--param=") => {
                params.push(token.trim_start_matches("--param=").to_string());
            }
            "--params" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--params requires a value");
                };
                params_file = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--params=") => {
                params_file = Some(PathBuf::from(token.trim_start_matches("--params=")));
            }
            "--no-lint" => lint = false,
            "--deny-warnings" => deny_warnings = true,
            "-v" | "--verbose" => verbose = true,
            _ if token.starts_with('-') && token != "-" => anyhow::bail!("unknown argument: {token}"),
            _ if file.is_none() => file = Some(PathBuf::from(token)),
            other => anyhow::bail!("unexpected extra file: {other}"),
        }
    }

    Ok(Command::Render(RenderArgs {
        config,
        file: file.filter(|f| f.as_os_str() != "-"),
        params,
        params_file,
        lint,
        deny_warnings,
        verbose,
    }))
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Init)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Init(InitArgs { config }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqlpeek - preview MyBatis-style dynamic SQL as literal SQL

USAGE:
  sqlpeek <COMMAND> [OPTIONS]

COMMANDS:
  params        List the placeholders a template asks for
  render        Render a template with parameter values
  init          Write a default sqlpeek.toml

Run `sqlpeek <command> --help` for more."
            );
        }
        HelpTopic::Params => {
            println!(
                "\
USAGE:
  sqlpeek params [FILE]

NOTES:
  Reads the template from stdin if no file is given.
  Prints one name per line, in order of first appearance.

OPTIONS:
  -h, --help            Print help"
            );
        }
        HelpTopic::Render => {
            println!(
                "\
USAGE:
  sqlpeek render [OPTIONS] [FILE]

NOTES:
  - Reads the template from stdin if no file is given (or FILE is -).
  - Parameter precedence: config [params] < --params file < --param.
  - Values are spliced in as text; the output is for preview only.

OPTIONS:
  --config <FILE>       Config file path (default: sqlpeek.toml, optional)
  -p, --param <K=V>     Set a parameter (repeatable)
  --params <FILE>       Load parameters from a .json or .toml file
  --no-lint             Skip lint of the rendered SQL
  --deny-warnings       Treat warnings as errors
  -v, --verbose         Debug logs on stderr
  -h, --help            Print help"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  sqlpeek init [OPTIONS]

OPTIONS:
  --config <FILE>       Output config path (default: sqlpeek.toml)
  -h, --help            Print help"
            );
        }
    }
}
