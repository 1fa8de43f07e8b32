use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Flock settings as stored in a JSON settings file.
///
/// Missing fields fall back to their defaults, so a file only needs to name
/// the values it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub radius: f64,
    pub population: usize,
    /// Delay between frames, in milliseconds
    pub tick_millis: u64,
    pub glyph: char,
    pub separation_factor: f64,
    pub alignment_factor: f64,
    pub cohesion_factor: f64,
    pub turn_impulse: f64,
    pub margin: f64,
    pub separation_threshold: f64,
    pub max_speed: f64,
    pub min_speed: f64,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            radius: 20.0,
            population: 250,
            tick_millis: 100,
            glyph: 'o',
            separation_factor: 0.05,
            alignment_factor: 0.05,
            cohesion_factor: 0.0008,
            turn_impulse: 0.2,
            margin: 25.0,
            separation_threshold: 2.0,
            max_speed: 2.5,
            min_speed: 1.0,
        }
    }
}

impl FlockSettings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the front-end rules. The tuning factors themselves are
    /// validated again by the simulation core.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.population == 0 {
            return Err(SettingsError::Invalid(
                "population must be greater than 0".to_string(),
            ));
        }

        if self.tick_millis == 0 {
            return Err(SettingsError::Invalid(
                "tick_millis must be greater than 0".to_string(),
            ));
        }

        if self.glyph.is_control() || self.glyph.is_whitespace() {
            return Err(SettingsError::Invalid(format!(
                "glyph {:?} is not a visible character",
                self.glyph
            )));
        }

        Ok(())
    }
}

/// Summary printed after a headless run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub ticks: u64,
    pub population: usize,
    pub height: u32,
    pub width: u32,
    pub mean_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub mean_neighbors: f64,
    pub centroid: (f64, f64),
    pub elapsed_millis: u64,
}
