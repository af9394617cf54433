//! Session state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::population::Population;
use crate::color::Rgb;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created, population not yet filled
    Idle,
    /// Ticking
    Running,
    /// Duration elapsed or quit received; no further mutation
    Finished,
}

/// Which palette a disc was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    Good,
    Bad,
}

/// A moving disc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub class: ColorClass,
    pub color: Rgb,
    /// Single-axis wall reflections so far
    pub bumps: u32,
}

impl Disc {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, class: ColorClass, color: Rgb) -> Self {
        Self {
            id,
            pos,
            vel,
            class,
            color,
            bumps: 0,
        }
    }

    #[inline]
    pub fn is_expired(&self, max_bumps: u32) -> bool {
        self.bumps >= max_bumps
    }
}

/// Read-only view of a live disc, handed to renderers and input sources
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscView {
    pub id: u32,
    pub pos: Vec2,
    pub color: Rgb,
    pub radius: f32,
}

/// Everything a running session mutates
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Frames fully processed
    pub frames: u64,
    pub good_clicks: u32,
    pub bad_clicks: u32,
    /// Discs removed for reaching the bump limit
    pub expired: u32,
    pub population: Population,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            frames: 0,
            good_clicks: 0,
            bad_clicks: 0,
            expired: 0,
            population: Population::new(),
        }
    }

    /// Credit a click on a disc of the given class
    pub fn record_click(&mut self, class: ColorClass) {
        match class {
            ColorClass::Good => self.good_clicks += 1,
            ColorClass::Bad => self.bad_clicks += 1,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
