//! Frame-stepped motion and wall reflection
//!
//! One step is one frame: `pos += vel`, no sub-stepping. Each axis is checked
//! independently after integration, so a corner hit flips both components and
//! counts as two bumps.

use glam::Vec2;

use super::state::Disc;
use crate::config::SimConfig;

/// Advance a disc by one frame and reflect it off the arena walls
///
/// Returns the number of bumps added this frame (0, 1 or 2).
pub fn step(disc: &mut Disc, config: &SimConfig) -> u32 {
    disc.pos += disc.vel;

    let (flip_x, flip_y) = wall_contacts(disc.pos, config);
    let mut bumps = 0;
    if flip_x {
        disc.vel.x = -disc.vel.x;
        bumps += 1;
    }
    if flip_y {
        disc.vel.y = -disc.vel.y;
        bumps += 1;
    }
    disc.bumps += bumps;
    bumps
}

/// Which axes touch or cross a wall (inclusive of the boundary)
#[inline]
pub fn wall_contacts(pos: Vec2, config: &SimConfig) -> (bool, bool) {
    let r = config.radius;
    (
        pos.x <= r || pos.x >= config.arena_width - r,
        pos.y <= r || pos.y >= config.arena_height - r,
    )
}
