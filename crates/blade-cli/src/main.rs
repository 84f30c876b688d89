//! blade CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blade_cli::cmd;
use blade_cli::ensure;
use blade_cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("blade: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Test { file } => {
            // The evaluator is only needed for commands that touch config.
            let pkl = ensure::ensure_pkl(cli.yes).await?;
            cmd::test::test(&pkl, &file).await
        }
        Commands::Version => {
            cmd::version::version();
            Ok(())
        }
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}

/// Map `-v` counts to a default filter, letting `RUST_LOG` take precedence.
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
