use core::f64::consts::TAU;

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::behavior::{self, Motion};
use crate::config::{validate_radius, Config, ConfigError};
use crate::vector::Vector2;

/// A single flocking agent
#[derive(Debug, Clone, PartialEq)]
pub struct Birdoid {
    pub position: Vector2,
    pub velocity: Vector2,
    neighbors: Vec<usize>,
}

impl Birdoid {
    pub fn new(position: Vector2, velocity: Vector2) -> Self {
        Self {
            position,
            velocity,
            neighbors: Vec::new(),
        }
    }

    /// Place a birdoid uniformly inside `[0, width) x [0, height)` heading in
    /// a uniformly random direction at `speed`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, height: f64, width: f64, speed: f64) -> Self {
        let position = Vector2::new(sample(rng, width), sample(rng, height));
        let heading = rng.gen_range(0.0..TAU);
        let velocity = Vector2::new(heading.cos(), heading.sin()) * speed;
        Self::new(position, velocity)
    }

    /// Indices of the birdoids within perception radius as of the last tick,
    /// ascending. Empty before the first tick.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn motion(&self) -> Motion {
        Motion::new(self.position, self.velocity)
    }

    fn advance(&mut self, snapshot: &[Motion], height: f64, width: f64, config: &Config) {
        let me = self.motion();
        let flock = self.neighbors.iter().map(move |&j| &snapshot[j]);
        self.velocity = behavior::steer(&me, flock, height, width, config);
        self.position += self.velocity;
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, extent: f64) -> f64 {
    if extent > 0.0 {
        rng.gen_range(0.0..extent)
    } else {
        0.0
    }
}

/// The whole population together with the tuning it runs under.
#[derive(Debug, Clone)]
pub struct Flock {
    config: Config,
    perception_radius: f64,
    birdoids: Vec<Birdoid>,
}

impl Flock {
    /// Populate a flock with `population` birdoids scattered over the field.
    ///
    /// Every birdoid starts at exactly `config.min_speed` in a random
    /// direction. The random source is injected so runs can be reproduced.
    pub fn initialize<R: Rng + ?Sized>(
        radius: f64,
        population: usize,
        bounds_height: u32,
        bounds_width: u32,
        config: Config,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_radius(radius)?;

        let (height, width) = (f64::from(bounds_height), f64::from(bounds_width));
        let birdoids = (0..population)
            .map(|_| Birdoid::random(&mut *rng, height, width, config.min_speed))
            .collect();

        log::debug!(
            "Initialized flock of {} birdoids on a {}x{} field, radius {}",
            population,
            bounds_width,
            bounds_height,
            radius
        );

        Ok(Self {
            config,
            perception_radius: radius,
            birdoids,
        })
    }

    /// Build a flock from explicitly placed birdoids. Any neighbor data they
    /// carry is discarded.
    pub fn from_birdoids(
        radius: f64,
        birdoids: Vec<Birdoid>,
        config: Config,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_radius(radius)?;

        let birdoids = birdoids
            .into_iter()
            .map(|b| Birdoid::new(b.position, b.velocity))
            .collect();

        Ok(Self {
            config,
            perception_radius: radius,
            birdoids,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn perception_radius(&self) -> f64 {
        self.perception_radius
    }

    pub fn birdoids(&self) -> &[Birdoid] {
        &self.birdoids
    }

    pub fn len(&self) -> usize {
        self.birdoids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.birdoids.is_empty()
    }

    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vector2> + '_ {
        self.birdoids.iter().map(|b| b.position)
    }

    /// Advance every birdoid by one time unit on a field of the given size.
    pub fn tick(&mut self, bounds_height: u32, bounds_width: u32) {
        if self.birdoids.is_empty() {
            return;
        }

        self.update_neighbors();

        // Steering must see every birdoid as it was before this tick.
        let snapshot: Vec<Motion> = self.birdoids.iter().map(Birdoid::motion).collect();
        let (height, width) = (f64::from(bounds_height), f64::from(bounds_width));
        let config = &self.config;

        #[cfg(not(feature = "parallel"))]
        self.birdoids
            .iter_mut()
            .for_each(|b| b.advance(&snapshot, height, width, config));

        #[cfg(feature = "parallel")]
        self.birdoids
            .par_iter_mut()
            .for_each(|b| b.advance(&snapshot, height, width, config));

        log::trace!("Ticked {} birdoids", self.birdoids.len());
    }

    /// Rebuild every neighbor set from scratch with an all-pairs comparison.
    fn update_neighbors(&mut self) {
        let positions: Vec<Vector2> = self.positions().collect();

        #[cfg(not(feature = "parallel"))]
        let lists = pair_scan(&positions, self.perception_radius);
        #[cfg(feature = "parallel")]
        let lists = row_scan(&positions, self.perception_radius);

        for (b, list) in self.birdoids.iter_mut().zip(lists) {
            b.neighbors = list;
        }
    }
}

/// Neighbor lists from one pass over every unordered pair. Each list comes
/// out ascending because rows are visited in index order.
#[cfg_attr(feature = "parallel", allow(dead_code))]
fn pair_scan(positions: &[Vector2], radius: f64) -> Vec<Vec<usize>> {
    let n = positions.len();
    let mut lists = vec![Vec::new(); n];

    for i in 0..n {
        for j in i + 1..n {
            if positions[i].distance(positions[j]) < radius {
                lists[i].push(j);
                lists[j].push(i);
            }
        }
    }

    lists
}

/// Neighbor lists built one full row per birdoid, so every row can be
/// computed independently. Distances are symmetric bit for bit, which makes
/// the result identical to [`pair_scan`].
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
fn row_scan(positions: &[Vector2], radius: f64) -> Vec<Vec<usize>> {
    let row = |i: usize| -> Vec<usize> {
        let here = positions[i];
        positions
            .iter()
            .enumerate()
            .filter(|&(j, p)| j != i && here.distance(*p) < radius)
            .map(|(j, _)| j)
            .collect()
    };

    #[cfg(feature = "parallel")]
    return (0..positions.len()).into_par_iter().map(row).collect();

    #[cfg(not(feature = "parallel"))]
    (0..positions.len()).map(row).collect()
}
