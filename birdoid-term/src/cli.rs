use std::path::PathBuf;

use anyhow::{Context, Result};
use birdoid_shared::FlockSettings;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Flocking birdoids in your terminal", long_about = None)]
pub struct Args {
    /// JSON settings file; missing fields keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of birdoids
    #[arg(short = 'n', long)]
    pub population: Option<usize>,

    /// Perception radius in cells
    #[arg(short, long)]
    pub radius: Option<f64>,

    /// Delay between frames in milliseconds
    #[arg(short, long = "tick-ms")]
    pub tick_ms: Option<u64>,

    /// Seed for the initial placement; random when omitted
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Run without a terminal and print a JSON report
    #[arg(long)]
    pub headless: bool,

    /// Number of ticks to run in headless mode
    #[arg(long, default_value_t = 1000)]
    pub ticks: u64,

    /// Field width in headless mode
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Field height in headless mode
    #[arg(long, default_value_t = 1000)]
    pub height: u32,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Default for Args {
    /// The arguments of a bare `birdoid` invocation.
    fn default() -> Self {
        Self::parse_from(["birdoid"])
    }
}

impl Args {
    /// Defaults, then the settings file, then command line overrides.
    pub fn settings(&self) -> Result<FlockSettings> {
        let mut settings = match &self.config {
            Some(path) => FlockSettings::from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => FlockSettings::default(),
        };

        if let Some(population) = self.population {
            settings.population = population;
        }
        if let Some(radius) = self.radius {
            settings.radius = radius;
        }
        if let Some(tick_ms) = self.tick_ms {
            settings.tick_millis = tick_ms;
        }

        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }
}
