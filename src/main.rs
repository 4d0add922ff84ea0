//! stubscan CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stubscan::cli::{Cli, Commands};
use stubscan::commands::{run_enrich, run_extract, run_fetch, run_version, CommandContext};
use stubscan::StubscanConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run(cli: Cli) -> stubscan::Result<String> {
    let config = StubscanConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging.level, cli.verbose);

    let ctx = CommandContext::new(config);
    match &cli.command {
        Commands::Extract(args) => run_extract(args, &ctx),
        Commands::Enrich(args) => run_enrich(args, &ctx),
        Commands::Fetch => run_fetch(&ctx),
        Commands::Version(args) => run_version(args, &ctx),
    }
}

/// Logs go to stderr; stdout is reserved for command output.
///
/// `-v` forces debug level, otherwise `RUST_LOG` wins over the configured level.
fn init_logging(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,stubscan=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,stubscan={}", level)))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
