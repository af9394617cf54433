//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-counted time only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the live discs)
//! - No rendering or platform dependencies

pub mod hit;
pub mod physics;
pub mod population;
pub mod spawn;
pub mod state;
pub mod tick;

pub use hit::{contains, hit_test};
pub use physics::step;
pub use population::{FrameStats, Population};
pub use spawn::spawn;
pub use state::{ColorClass, Disc, DiscView, SessionPhase, SessionState};
pub use tick::{InputEvent, Session, SessionReport};
