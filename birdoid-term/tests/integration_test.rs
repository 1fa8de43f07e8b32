use anyhow::Result;
use birdoid_core::Vector2;
use birdoid_shared::FlockSettings;
use birdoid_term::{build_flock, run_frames, run_headless, Args, FrameBuffer, Renderer};
use std::io::Write;

/// Renderer that records every frame it is asked to draw
struct RecordingRenderer {
    height: u32,
    width: u32,
    frames: Vec<Vec<Vector2>>,
}

impl RecordingRenderer {
    fn new(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            frames: Vec::new(),
        }
    }
}

impl Renderer for RecordingRenderer {
    fn bounds(&self) -> Result<(u32, u32)> {
        Ok((self.height, self.width))
    }

    fn draw(&mut self, positions: &[Vector2]) -> Result<()> {
        self.frames.push(positions.to_vec());
        Ok(())
    }
}

fn small_settings(population: usize) -> FlockSettings {
    FlockSettings {
        population,
        ..FlockSettings::default()
    }
}

#[test]
fn test_frames_draw_before_tick() -> Result<()> {
    let settings = small_settings(30);
    let mut flock = build_flock(&settings, 80, 120, Some(11))?;
    let initial: Vec<Vector2> = flock.positions().collect();

    let mut renderer = RecordingRenderer::new(80, 120);
    run_frames(&mut flock, &mut renderer, 3)?;

    assert_eq!(renderer.frames.len(), 3);
    // The first frame shows the flock as initialized.
    assert_eq!(renderer.frames[0], initial);
    assert!(renderer.frames.iter().all(|f| f.len() == 30));
    assert_ne!(renderer.frames[1], renderer.frames[0]);
    Ok(())
}

#[test]
fn test_frame_buffer_tracks_flock() -> Result<()> {
    let settings = small_settings(50);
    let mut flock = build_flock(&settings, 40, 100, Some(3))?;
    let mut frame = FrameBuffer::new(40, 100, settings.glyph);

    run_frames(&mut flock, &mut frame, 1)?;

    // Initial positions all lie inside the field, so at least one cell is
    // drawn and never more cells than birdoids.
    assert!(frame.occupied() >= 1);
    assert!(frame.occupied() <= 50);
    assert_eq!(frame.rows().count(), 40);
    assert!(frame.rows().all(|row| row.chars().count() == 100));
    Ok(())
}

#[test]
fn test_headless_run_is_reproducible() -> Result<()> {
    let settings = small_settings(60);

    let first = run_headless(&settings, 300, 300, 40, Some(99))?;
    let second = run_headless(&settings, 300, 300, 40, Some(99))?;

    assert_eq!(first.population, 60);
    assert_eq!(first.ticks, 40);
    assert_eq!(first.centroid, second.centroid);
    assert_eq!(first.mean_speed, second.mean_speed);
    assert_eq!(first.mean_neighbors, second.mean_neighbors);
    Ok(())
}

#[test]
fn test_headless_speeds_respect_limits() -> Result<()> {
    let settings = small_settings(80);
    let report = run_headless(&settings, 200, 200, 100, Some(5))?;

    let tolerance = 1e-9;
    assert!(report.min_speed >= settings.min_speed - tolerance);
    assert!(report.max_speed <= settings.max_speed + tolerance);
    assert!(report.mean_speed >= report.min_speed);
    assert!(report.mean_speed <= report.max_speed);
    Ok(())
}

#[test]
fn test_settings_file_with_overrides() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{ "population": 15, "radius": 9.0, "cohesion_factor": 0.002 }}"#
    )?;

    let args = Args {
        config: Some(file.path().to_path_buf()),
        radius: Some(12.0),
        ..Args::default()
    };
    let settings = args.settings()?;

    assert_eq!(settings.population, 15);
    assert_eq!(settings.radius, 12.0);
    assert_eq!(settings.cohesion_factor, 0.002);
    assert_eq!(settings.tick_millis, 100);
    Ok(())
}

#[test]
fn test_invalid_settings_file_is_reported() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "not json")?;

    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };
    let err = args.settings().unwrap_err();
    assert!(err.to_string().starts_with("Failed to load settings from"));
    Ok(())
}
