//! budgetsim - Main CLI Entry Point

use anyhow::{Context, Result};
use budgetsim::{
    cli::{Args, Commands, Config},
    execution::run_simulators,
    report::reporter_for,
    telemetry,
};
use clap::Parser;
use colored::Colorize;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init(args.verbosity())?;

    let config = Config::load(args.config.clone()).context("Failed to load scenario configuration")?;

    match args.command() {
        Commands::Run => run(&args, &config).await,
        Commands::Validate => {
            println!(
                "{} {} simulator(s) valid",
                "✓".green(),
                config.simulators.len()
            );
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

async fn run(args: &Args, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.output.format);
    let color = config.output.color && !args.no_color;
    colored::control::set_override(color);

    let stdout = std::io::stdout();
    let mut reporter = reporter_for(format, stdout.lock(), color);
    run_simulators(config, args.only.as_deref(), reporter.as_mut())
        .await
        .context("Simulation failed")?;

    Ok(())
}
