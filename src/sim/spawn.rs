//! Disc spawning
//!
//! All randomness in the simulation flows through here, drawn from the
//! session's seeded RNG.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{ColorClass, Disc};
use crate::config::SimConfig;

/// Create a disc at a random in-bounds position with a random velocity
///
/// The class is Good with probability `good_ratio`; the concrete color is
/// picked uniformly from that class's palette. A zero velocity is legal.
pub fn spawn<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R, id: u32) -> Disc {
    let class = if rng.random_bool(config.good_ratio as f64) {
        ColorClass::Good
    } else {
        ColorClass::Bad
    };
    let palette = match class {
        ColorClass::Good => &config.good_palette,
        ColorClass::Bad => &config.bad_palette,
    };
    // Palettes are non-empty once validated
    let color = palette.choose(rng).copied().unwrap_or_default();

    let pos = random_position(config, rng);
    let vel = random_velocity(config.speed_range, rng);

    Disc::new(id, pos, vel, class, color)
}

/// Uniform position in [radius, dimension - radius] on each axis
pub fn random_position<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Vec2 {
    let r = config.radius;
    Vec2::new(
        rng.random_range(r..=config.arena_width - r),
        rng.random_range(r..=config.arena_height - r),
    )
}

/// Uniform velocity components in [-speed, speed]
///
/// Drawn on the unit interval and scaled, so the range width never overflows.
pub fn random_velocity<R: Rng + ?Sized>(speed: f32, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random_range(-1.0f32..=1.0) * speed,
        rng.random_range(-1.0f32..=1.0) * speed,
    )
}
