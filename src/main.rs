use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_tracing(&args);
    cli::run(args)
}

/// Logs go to stderr so `--format json` output stays machine-readable.
fn init_tracing(args: &cli::Cli) {
    let default = if args.verbose {
        "debug"
    } else if matches!(args.command, Some(cli::Commands::Serve(_))) {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
