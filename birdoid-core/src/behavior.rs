//! The steering rules applied to a single birdoid.
//!
//! Every function here is pure: it reads the birdoid's pre-tick
//! [`Motion`], the motions of its neighbors and the [`Config`], and returns a
//! vector. [`steer`] combines them into the velocity for the next tick.

use crate::config::Config;
use crate::vector::Vector2;

/// Position and velocity of one birdoid at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    pub position: Vector2,
    pub velocity: Vector2,
}

impl Motion {
    pub fn new(position: Vector2, velocity: Vector2) -> Self {
        Self { position, velocity }
    }
}

/// Sum of the raw offsets away from every neighbor closer than the
/// separation threshold, scaled by the separation factor.
pub fn separation<'a, I>(boid: &Motion, flock: I, config: &Config) -> Vector2
where
    I: IntoIterator<Item = &'a Motion>,
{
    let push: Vector2 = flock
        .into_iter()
        .filter(|other| boid.position.distance(other.position) < config.separation_threshold)
        .map(|other| boid.position - other.position)
        .sum();

    push * config.separation_factor
}

/// Average neighbor velocity scaled by the alignment factor, or zero when
/// the birdoid has no neighbors.
pub fn alignment<'a, I>(flock: I, config: &Config) -> Vector2
where
    I: IntoIterator<Item = &'a Motion>,
{
    match mean(flock.into_iter().map(|other| other.velocity)) {
        Some(heading) => heading * config.alignment_factor,
        None => Vector2::ZERO,
    }
}

/// Vector from the birdoid to its neighbors' centroid scaled by the cohesion
/// factor, or zero when the birdoid has no neighbors.
pub fn cohesion<'a, I>(boid: &Motion, flock: I, config: &Config) -> Vector2
where
    I: IntoIterator<Item = &'a Motion>,
{
    match mean(flock.into_iter().map(|other| other.position)) {
        Some(centroid) => (centroid - boid.position) * config.cohesion_factor,
        None => Vector2::ZERO,
    }
}

/// Turn impulse pushing a birdoid back from the field edges. The four edges
/// are checked independently, so corners get both components.
pub fn boundary(position: Vector2, height: f64, width: f64, config: &Config) -> Vector2 {
    let mut impulse = Vector2::ZERO;

    if position.x < config.margin {
        impulse.x += config.turn_impulse;
    }
    if position.x > width - config.margin {
        impulse.x -= config.turn_impulse;
    }
    if position.y < config.margin {
        impulse.y += config.turn_impulse;
    }
    if position.y > height - config.margin {
        impulse.y -= config.turn_impulse;
    }

    impulse
}

/// Rescale `velocity` so its magnitude lies in `[min_speed, max_speed]`.
///
/// A zero velocity has no direction to rescale; it is replaced by
/// `(min_speed, 0)` so a resting birdoid starts moving along +x.
pub fn clamp_speed(velocity: Vector2, config: &Config) -> Vector2 {
    let speed = velocity.magnitude();

    if speed > config.max_speed {
        velocity / speed * config.max_speed
    } else if speed < config.min_speed {
        if speed == 0.0 {
            Vector2::new(config.min_speed, 0.0)
        } else {
            velocity / speed * config.min_speed
        }
    } else {
        velocity
    }
}

/// Velocity for the next tick: the old velocity plus the three flocking
/// rules and the boundary impulse, clamped to the configured speed range.
pub fn steer<'a, I>(boid: &Motion, flock: I, height: f64, width: f64, config: &Config) -> Vector2
where
    I: IntoIterator<Item = &'a Motion>,
    I::IntoIter: Clone,
{
    let flock = flock.into_iter();

    let mut velocity = boid.velocity;
    velocity += separation(boid, flock.clone(), config);
    velocity += alignment(flock.clone(), config);
    velocity += cohesion(boid, flock, config);
    velocity += boundary(boid.position, height, width, config);

    clamp_speed(velocity, config)
}

fn mean<I>(values: I) -> Option<Vector2>
where
    I: Iterator<Item = Vector2>,
{
    let (sum, count) = values.fold((Vector2::ZERO, 0usize), |(sum, count), v| {
        (sum + v, count + 1)
    });

    if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    }
}
