//! Pointer hit testing

use glam::Vec2;

use super::state::Disc;

/// Whether `point` lies strictly inside a disc of `radius` centred at `center`
#[inline]
pub fn contains(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance(point) < radius
}

/// Index of the first disc (in canonical order) containing `point`
///
/// Overlapping discs are not disambiguated; first in order wins.
pub fn hit_test(discs: &[Disc], radius: f32, point: Vec2) -> Option<usize> {
    discs.iter().position(|d| contains(d.pos, radius, point))
}
