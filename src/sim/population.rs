//! Live disc set and its replenishment policy
//!
//! Discs are kept in insertion order; that order is the canonical order for
//! hit testing and snapshots. Removals (expiry or click) are replaced 1:1 by
//! a fresh spawn appended at the end.

use glam::Vec2;
use rand::Rng;

use super::hit::hit_test;
use super::physics;
use super::spawn::spawn;
use super::state::{ColorClass, Disc, DiscView};
use crate::config::SimConfig;

/// Result of one physics frame over the population
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Discs removed for reaching the bump limit
    pub expired: u32,
    /// Discs spawned (replacements plus startup fill)
    pub spawned: u32,
}

/// Owns the live discs
#[derive(Debug, Clone)]
pub struct Population {
    discs: Vec<Disc>,
    next_id: u32,
    /// Ticks since the last startup fill spawn
    fill_ticks: u32,
}

impl Population {
    pub fn new() -> Self {
        Self {
            discs: Vec::new(),
            next_id: 1,
            fill_ticks: 0,
        }
    }

    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    pub fn len(&self) -> usize {
        self.discs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discs.is_empty()
    }

    /// Insert a disc directly (scenario setup, replays)
    pub fn push(&mut self, mut disc: Disc) {
        disc.id = self.next_entity_id();
        self.discs.push(disc);
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_one<R: Rng + ?Sized>(&mut self, config: &SimConfig, rng: &mut R) {
        let id = self.next_entity_id();
        self.discs.push(spawn(config, rng, id));
    }

    /// Prepare for a new session
    ///
    /// Fills to target immediately unless a fill interval is configured, in
    /// which case discs trickle in from [`Population::advance`].
    pub fn reset<R: Rng + ?Sized>(&mut self, config: &SimConfig, rng: &mut R) {
        self.discs.clear();
        self.fill_ticks = 0;
        if config.fill_interval_ticks == 0 {
            while self.discs.len() < config.target_population {
                self.spawn_one(config, rng);
            }
        }
    }

    /// Step every disc, reap the expired ones and replace them
    pub fn advance<R: Rng + ?Sized>(&mut self, config: &SimConfig, rng: &mut R) -> FrameStats {
        for disc in &mut self.discs {
            physics::step(disc, config);
        }

        // Mark-and-reap: removal happens after the stepping pass
        let mut expired = 0;
        self.discs.retain(|d| {
            let keep = !d.is_expired(config.max_bumps);
            if !keep {
                log::debug!("disc {} expired after {} bumps", d.id, d.bumps);
                expired += 1;
            }
            keep
        });
        for _ in 0..expired {
            self.spawn_one(config, rng);
        }

        let filled = self.fill(config, rng);
        FrameStats {
            expired,
            spawned: expired + filled,
        }
    }

    /// Startup trickle: one spawn every `fill_interval_ticks` while under target
    fn fill<R: Rng + ?Sized>(&mut self, config: &SimConfig, rng: &mut R) -> u32 {
        if self.discs.len() >= config.target_population {
            return 0;
        }
        if config.fill_interval_ticks == 0 {
            let missing = config.target_population - self.discs.len();
            for _ in 0..missing {
                self.spawn_one(config, rng);
            }
            return missing as u32;
        }

        self.fill_ticks += 1;
        if self.fill_ticks >= config.fill_interval_ticks {
            self.fill_ticks = 0;
            self.spawn_one(config, rng);
            1
        } else {
            0
        }
    }

    /// Resolve a click: remove the first disc under `point` and spawn its replacement
    ///
    /// Returns the class of the disc that was hit.
    pub fn click<R: Rng + ?Sized>(
        &mut self,
        point: Vec2,
        config: &SimConfig,
        rng: &mut R,
    ) -> Option<ColorClass> {
        let index = hit_test(&self.discs, config.radius, point)?;
        let disc = self.discs.remove(index);
        log::debug!(
            "click ({:.1}, {:.1}) hit disc {} ({:?}, {})",
            point.x,
            point.y,
            disc.id,
            disc.class,
            disc.color
        );
        self.spawn_one(config, rng);
        Some(disc.class)
    }

    /// Frame-final read-only view for rendering
    pub fn snapshot(&self, radius: f32) -> Vec<DiscView> {
        self.discs
            .iter()
            .map(|d| DiscView {
                id: d.id,
                pos: d.pos,
                color: d.color,
                radius,
            })
            .collect()
    }
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}
