mod cli;
mod config;
mod init;
mod input;
mod params;
mod render;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Params(args) => {
            init_tracing(false);
            params::run(args)
        }
        cli::Command::Render(args) => {
            init_tracing(args.verbose);
            render::run(args)
        }
        cli::Command::Init(args) => init::run(args),
    }
}

/// Logs go to stderr so rendered SQL on stdout stays pipeable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sqlpeek=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
