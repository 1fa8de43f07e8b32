use thiserror::Error;

/// Errors raised when a flock is built from contradictory or non-finite tuning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidFactor { field: &'static str, value: f64 },

    #[error("min_speed ({min_speed}) must not exceed max_speed ({max_speed})")]
    SpeedRange { min_speed: f64, max_speed: f64 },

    #[error("perception radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),
}

/// Tuning for the flocking rules.
///
/// A `Flock` keeps its own copy and only hands out shared references, so the
/// values cannot change while a simulation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub separation_factor: f64,
    pub alignment_factor: f64,
    pub cohesion_factor: f64,
    pub turn_impulse: f64,
    pub margin: f64,
    pub separation_threshold: f64,
    pub max_speed: f64,
    pub min_speed: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
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

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("separation_factor", self.separation_factor),
            ("alignment_factor", self.alignment_factor),
            ("cohesion_factor", self.cohesion_factor),
            ("turn_impulse", self.turn_impulse),
            ("margin", self.margin),
            ("separation_threshold", self.separation_threshold),
            ("max_speed", self.max_speed),
            ("min_speed", self.min_speed),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidFactor { field, value });
            }
        }

        if self.min_speed > self.max_speed {
            return Err(ConfigError::SpeedRange {
                min_speed: self.min_speed,
                max_speed: self.max_speed,
            });
        }

        Ok(())
    }
}

pub(crate) fn validate_radius(radius: f64) -> Result<(), ConfigError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(ConfigError::InvalidRadius(radius));
    }
    Ok(())
}
