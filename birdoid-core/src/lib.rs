//! Flocking simulation core.
//!
//! A [`Flock`] owns a fixed population of [`Birdoid`]s. Each call to
//! [`Flock::tick`] rebuilds every birdoid's neighbor set with an all-pairs
//! distance check, steers each birdoid by separation, alignment, cohesion
//! and a boundary impulse, clamps its speed and moves it one step. Nothing
//! here performs I/O; drawing the positions is left to the caller.

pub mod behavior;
pub mod config;
pub mod flock;
pub mod vector;

pub use behavior::Motion;
pub use config::{Config, ConfigError};
pub use flock::{Birdoid, Flock};
pub use vector::Vector2;
