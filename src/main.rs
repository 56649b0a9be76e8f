use clap::Parser;
use colored::Colorize;
use ryzen_set::cli::Cli;
use ryzen_set::error::Error;
use ryzen_set::ryzenadj::RyzenAdjLibrary;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let config = ryzen_set::config::load(cli.config.as_deref());

    match ryzen_set::commands::run(cli, &config, RyzenAdjLibrary::open) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(err) if err.is_usage() => println!("{}", err),
                _ => eprintln!("{} {:#}", "error:".red().bold(), e),
            }
            ExitCode::from(1)
        }
    }
}
