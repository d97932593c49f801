mod run;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = spendsort::config::Config::from_env().context("Failed to read configuration")?;

    match args.len() {
        1 => {
            run::print_usage();
            Ok(())
        }
        _ => run::as_cli(&args, &config),
    }
}
