//! Disc Click - a time-bounded disc clicking simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, hit testing, session loop)
//! - `config`: JSON configuration and validation
//! - `color`: Color specification parsing
//! - `input`: Input collaborators (scripted traces, automatic clicker)

pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod sim;

pub use color::{Rgb, parse_color};
pub use config::{GameConfig, SimConfig};
pub use error::{ConfigError, ScriptError};
pub use sim::{DiscView, InputEvent, Session, SessionPhase, SessionReport};

/// Game configuration defaults
pub mod consts {
    /// Disc radius when the config does not set one
    pub const DEFAULT_ENTITY_RADIUS: u32 = 30;
    /// Share of spawned discs drawn from the good palette
    pub const DEFAULT_GOOD_RATIO: f32 = 0.7;
    /// Wall bumps before a disc expires
    pub const DEFAULT_MAX_BUMPS: u32 = 3;
    /// Maximum ticks the realtime runner will catch up in one wake-up
    pub const MAX_CATCH_UP_TICKS: u32 = 8;
    /// Fraction of a frame ignored when rounding the session length up to whole frames
    pub const FRAME_BUDGET_TOLERANCE: f64 = 1e-9;
}
