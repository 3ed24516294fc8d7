//! MotoCash command-line entry point.

use clap::Parser;
use motocash_cli::cli::Cli;
use motocash_cli::config::AppConfig;
use motocash_cli::error::AppResult;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    motocash_cli::init_tracing();

    if let Err(err) = execute(cli).await {
        eprintln!("error: {}", err);
        std::process::exit(err.exit_code());
    }
}

async fn execute(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.config.clone())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    motocash_cli::run(cli, &config, &mut out).await
}
