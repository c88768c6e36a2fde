//! The `meekc` binary: parse CLI arguments, wire up logging, and drive
//! `meekc::driver::run`.

use anyhow::Result;
use clap::Parser as _;
use meekc::args::CliArgs;
use meekc::driver;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args);

    driver::require_exists(&args.path)?;

    let succeeded = driver::run(&args)?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.default_log_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
