mod cmd;
mod config;
mod error;

use clap::Parser;
use config::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let result = config::load_options(cli.config.as_deref()).and_then(|options| {
        match cli.command {
            Commands::Keys(args) => cmd::keys::run(&args, &options),
            Commands::Coerce(args) => cmd::coerce::run(&args),
        }
    });
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
