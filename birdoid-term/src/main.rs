use anyhow::{Context, Result};
use birdoid_term::{run_headless, run_interactive, Args};
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let settings = args.settings()?;

    log::info!("Birdoid starting...");
    log::info!(
        "Population: {}, radius: {}, tick: {}ms",
        settings.population,
        settings.radius,
        settings.tick_millis
    );

    if args.headless {
        let report = run_headless(&settings, args.height, args.width, args.ticks, args.seed)
            .context("Headless run failed")?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        run_interactive(&settings, args.seed).context("Simulation error")?;
    }

    Ok(())
}
