use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use birdoid_core::{Config, Flock, Vector2};
use birdoid_shared::{FlockSettings, RunReport};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::render::{Renderer, TerminalRenderer};

pub fn core_config(settings: &FlockSettings) -> Config {
    Config {
        separation_factor: settings.separation_factor,
        alignment_factor: settings.alignment_factor,
        cohesion_factor: settings.cohesion_factor,
        turn_impulse: settings.turn_impulse,
        margin: settings.margin,
        separation_threshold: settings.separation_threshold,
        max_speed: settings.max_speed,
        min_speed: settings.min_speed,
    }
}

/// Scatter a new flock over a `height` x `width` field.
pub fn build_flock(
    settings: &FlockSettings,
    height: u32,
    width: u32,
    seed: Option<u64>,
) -> Result<Flock> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    Flock::initialize(
        settings.radius,
        settings.population,
        height,
        width,
        core_config(settings),
        &mut rng,
    )
    .context("Failed to initialize flock")
}

/// One frame of the display loop: read the bounds, draw the current
/// positions, then advance the flock.
pub fn frame<R: Renderer>(
    flock: &mut Flock,
    renderer: &mut R,
    positions: &mut Vec<Vector2>,
) -> Result<()> {
    let (height, width) = renderer.bounds()?;

    positions.clear();
    positions.extend(flock.positions());
    renderer.draw(&positions[..])?;

    flock.tick(height, width);
    Ok(())
}

/// Run `frames` frames against any renderer without reading input.
pub fn run_frames<R: Renderer>(flock: &mut Flock, renderer: &mut R, frames: u64) -> Result<()> {
    let mut positions = Vec::with_capacity(flock.len());
    for _ in 0..frames {
        frame(flock, renderer, &mut positions)?;
    }
    Ok(())
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Wait up to `timeout` for input; true when the user asked to quit.
fn quit_requested(timeout: Duration) -> Result<bool> {
    if event::poll(timeout).context("Failed to poll input")? {
        if let Event::Key(key) = event::read().context("Failed to read input")? {
            return Ok(is_quit_key(&key));
        }
    }
    Ok(false)
}

/// Draw the flock on the terminal until a quit key is pressed.
pub fn run_interactive(settings: &FlockSettings, seed: Option<u64>) -> Result<()> {
    let mut renderer = TerminalRenderer::new(settings.glyph)?;
    let (height, width) = renderer.bounds()?;
    let mut flock = build_flock(settings, height, width, seed)?;

    log::info!("Starting main loop on a {}x{} terminal...", width, height);

    let delay = Duration::from_millis(settings.tick_millis);
    let mut positions = Vec::with_capacity(flock.len());
    let mut frames = 0u64;

    loop {
        let started = Instant::now();
        frame(&mut flock, &mut renderer, &mut positions)?;
        frames += 1;

        let remaining = delay.saturating_sub(started.elapsed());
        if quit_requested(remaining)? {
            log::info!("Quit requested after {} frames", frames);
            break;
        }
    }

    Ok(())
}

/// Tick a flock on a fixed field without a terminal and summarize the result.
pub fn run_headless(
    settings: &FlockSettings,
    height: u32,
    width: u32,
    ticks: u64,
    seed: Option<u64>,
) -> Result<RunReport> {
    let mut flock = build_flock(settings, height, width, seed)?;

    let started = Instant::now();
    for _ in 0..ticks {
        flock.tick(height, width);
    }
    let elapsed = started.elapsed();

    log::debug!("Ran {} ticks in {:?}", ticks, elapsed);
    Ok(summarize(&flock, ticks, height, width, elapsed))
}

pub fn summarize(
    flock: &Flock,
    ticks: u64,
    height: u32,
    width: u32,
    elapsed: Duration,
) -> RunReport {
    let count = flock.len();
    let speeds: Vec<f64> = flock
        .birdoids()
        .iter()
        .map(|b| b.velocity.magnitude())
        .collect();

    let (mean_speed, min_speed, max_speed, mean_neighbors, centroid) = if count == 0 {
        (0.0, 0.0, 0.0, 0.0, (0.0, 0.0))
    } else {
        let n = count as f64;
        let total_neighbors: usize = flock.birdoids().iter().map(|b| b.neighbors().len()).sum();
        let centre = flock.positions().sum::<Vector2>() / n;
        (
            speeds.iter().sum::<f64>() / n,
            speeds.iter().copied().fold(f64::INFINITY, f64::min),
            speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            total_neighbors as f64 / n,
            (centre.x, centre.y),
        )
    };

    RunReport {
        ticks,
        population: count,
        height,
        width,
        mean_speed,
        min_speed,
        max_speed,
        mean_neighbors,
        centroid,
        elapsed_millis: elapsed.as_millis() as u64,
    }
}
