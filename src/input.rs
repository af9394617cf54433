//! Input collaborators
//!
//! The session pulls one event batch per frame from an [`InputSource`].
//! Real pointer input lives outside this crate; the sources here cover
//! replays and unattended runs.

use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ScriptError;
use crate::sim::{DiscView, InputEvent};

/// Supplies the input batch for each frame
pub trait InputSource {
    /// Events for `frame`, in delivery order. `discs` is what is currently on screen.
    fn poll(&mut self, frame: u64, discs: &[DiscView]) -> Vec<InputEvent>;
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll(&mut self, frame: u64, discs: &[DiscView]) -> Vec<InputEvent> {
        (**self).poll(frame, discs)
    }
}

/// Never produces input; the session runs until its duration elapses
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _frame: u64, _discs: &[DiscView]) -> Vec<InputEvent> {
        Vec::new()
    }
}

/// An event pinned to the frame it is delivered on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub frame: u64,
    pub event: InputEvent,
}

/// Replays a recorded event trace
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: Vec<ScriptedEvent>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(mut events: Vec<ScriptedEvent>) -> Self {
        // Stable: events on the same frame keep their recorded order
        events.sort_by_key(|e| e.frame);
        Self { events, cursor: 0 }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        let events: Vec<ScriptedEvent> = serde_json::from_str(json)?;
        Ok(Self::new(events))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_json_str(&json)?;
        log::info!("Loaded {} scripted events from {}", script.events.len(), path.display());
        Ok(script)
    }

    /// Events not yet delivered
    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, frame: u64, _discs: &[DiscView]) -> Vec<InputEvent> {
        let mut batch = Vec::new();
        while let Some(next) = self.events.get(self.cursor) {
            if next.frame > frame {
                break;
            }
            if next.frame < frame {
                log::warn!("scripted event for frame {} delivered late at frame {}", next.frame, frame);
            }
            batch.push(next.event);
            self.cursor += 1;
        }
        batch
    }
}

/// Records every batch another source produces, so a run can be replayed
#[derive(Debug)]
pub struct Recorder<I> {
    inner: I,
    log: Vec<ScriptedEvent>,
}

impl<I: InputSource> Recorder<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            log: Vec::new(),
        }
    }

    pub fn events(&self) -> &[ScriptedEvent] {
        &self.log
    }

    pub fn into_script(self) -> ScriptedInput {
        ScriptedInput::new(self.log)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.log).unwrap_or_default()
    }
}

impl<I: InputSource> InputSource for Recorder<I> {
    fn poll(&mut self, frame: u64, discs: &[DiscView]) -> Vec<InputEvent> {
        let batch = self.inner.poll(frame, discs);
        self.log
            .extend(batch.iter().map(|&event| ScriptedEvent { frame, event }));
        batch
    }
}

/// Tuning for [`AutoClicker`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoClickerConfig {
    /// Minimum frames between clicks
    pub click_interval: u32,
    /// Ignore targets this close to the previous click...
    pub min_click_distance: f32,
    /// ...for this many frames after it
    pub cooldown_frames: u32,
    /// Maximum aim error in pixels on each axis
    pub aim_jitter: f32,
    pub seed: u64,
}

impl Default for AutoClickerConfig {
    fn default() -> Self {
        Self {
            click_interval: 6,
            min_click_distance: 10.0,
            cooldown_frames: 15,
            aim_jitter: 0.0,
            seed: 0,
        }
    }
}

/// Clicks discs whose color is in its target palette
///
/// Works from what is on screen only (position and color), the way a
/// screen-reading clicker would.
#[derive(Debug, Clone)]
pub struct AutoClicker {
    config: AutoClickerConfig,
    targets: Vec<Rgb>,
    rng: Pcg32,
    last_click: Option<(u64, Vec2)>,
}

impl AutoClicker {
    pub fn new(targets: Vec<Rgb>, config: AutoClickerConfig) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        Self {
            config,
            targets,
            rng,
            last_click: None,
        }
    }

    fn pick_target(&self, frame: u64, discs: &[DiscView]) -> Option<Vec2> {
        discs
            .iter()
            .filter(|d| self.targets.contains(&d.color))
            .map(|d| d.pos)
            .find(|&pos| match self.last_click {
                Some((at, last)) if frame - at < self.config.cooldown_frames as u64 => {
                    pos.distance(last) >= self.config.min_click_distance
                }
                _ => true,
            })
    }
}

impl InputSource for AutoClicker {
    fn poll(&mut self, frame: u64, discs: &[DiscView]) -> Vec<InputEvent> {
        if let Some((at, _)) = self.last_click {
            if frame - at < self.config.click_interval as u64 {
                return Vec::new();
            }
        }

        let Some(target) = self.pick_target(frame, discs) else {
            return Vec::new();
        };
        let jitter = self.config.aim_jitter;
        let aim = if jitter > 0.0 && jitter.is_finite() {
            // Unit draws scaled by the jitter, so no range width can overflow
            target
                + Vec2::new(
                    self.rng.random_range(-1.0f32..=1.0),
                    self.rng.random_range(-1.0f32..=1.0),
                ) * jitter
        } else {
            target
        };

        self.last_click = Some((frame, aim));
        vec![InputEvent::click(aim.x, aim.y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: u32, x: f32, y: f32, color: Rgb) -> DiscView {
        DiscView {
            id,
            pos: Vec2::new(x, y),
            color,
            radius: 30.0,
        }
    }

    #[test]
    fn test_script_delivers_on_frame() {
        let json = r#"[
            {"frame": 2, "event": {"Click": {"x": 1.0, "y": 2.0}}},
            {"frame": 0, "event": {"Click": {"x": 5.0, "y": 5.0}}},
            {"frame": 2, "event": "Quit"}
        ]"#;
        let mut script = ScriptedInput::from_json_str(json).unwrap();
        assert_eq!(script.poll(0, &[]), vec![InputEvent::click(5.0, 5.0)]);
        assert!(script.poll(1, &[]).is_empty());
        assert_eq!(script.poll(2, &[]), vec![InputEvent::click(1.0, 2.0), InputEvent::Quit]);
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn test_script_late_events_flushed() {
        let mut script = ScriptedInput::new(vec![ScriptedEvent { frame: 1, event: InputEvent::Quit }]);
        assert_eq!(script.poll(5, &[]), vec![InputEvent::Quit]);
    }

    #[test]
    fn test_malformed_script() {
        let err = ScriptedInput::from_json_str(r#"[{"frame": "soon"}]"#).unwrap_err();
        assert!(matches!(err, ScriptError::Malformed(_)));
    }

    #[test]
    fn test_autoclicker_targets_palette_only() {
        let good = Rgb::new(255, 255, 255);
        let bad = Rgb::new(235, 106, 74);
        let mut clicker = AutoClicker::new(vec![good], AutoClickerConfig::default());
        let discs = [view(1, 10.0, 10.0, bad), view(2, 50.0, 60.0, good)];
        assert_eq!(clicker.poll(0, &discs), vec![InputEvent::click(50.0, 60.0)]);
    }

    #[test]
    fn test_autoclicker_interval_and_cooldown() {
        let good = Rgb::new(0, 255, 0);
        let config = AutoClickerConfig {
            click_interval: 3,
            min_click_distance: 10.0,
            cooldown_frames: 10,
            ..AutoClickerConfig::default()
        };
        let mut clicker = AutoClicker::new(vec![good], config);
        let discs = [view(1, 100.0, 100.0, good), view(2, 300.0, 300.0, good)];

        assert_eq!(clicker.poll(0, &discs), vec![InputEvent::click(100.0, 100.0)]);
        assert!(clicker.poll(1, &discs).is_empty());
        assert!(clicker.poll(2, &discs).is_empty());
        // Disc 1 is still under the last click, so move on to disc 2
        assert_eq!(clicker.poll(3, &discs), vec![InputEvent::click(300.0, 300.0)]);
    }

    #[test]
    fn test_autoclicker_jitter_bounded() {
        let good = Rgb::new(0, 0, 255);
        let config = AutoClickerConfig {
            click_interval: 1,
            cooldown_frames: 0,
            aim_jitter: 4.0,
            seed: 17,
            ..AutoClickerConfig::default()
        };
        let mut clicker = AutoClicker::new(vec![good], config);
        let discs = [view(1, 200.0, 200.0, good)];
        for frame in 0..50 {
            let batch = clicker.poll(frame, &discs);
            match batch.as_slice() {
                [InputEvent::Click { x, y }] => {
                    assert!((x - 200.0).abs() <= 4.0 && (y - 200.0).abs() <= 4.0);
                }
                other => panic!("expected one click, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_autoclicker_extreme_jitter() {
        let good = Rgb::new(0, 0, 255);
        let discs = [view(1, 200.0, 200.0, good)];
        for aim_jitter in [f32::MAX, f32::INFINITY, f32::NAN] {
            let config = AutoClickerConfig {
                aim_jitter,
                seed: 4,
                ..AutoClickerConfig::default()
            };
            let mut clicker = AutoClicker::new(vec![good], config);
            let batch = clicker.poll(0, &discs);
            match batch.as_slice() {
                [InputEvent::Click { x, y }] => assert!(x.is_finite() && y.is_finite()),
                other => panic!("expected one click, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_recorder_round_trip() {
        let good = Rgb::new(0, 0, 255);
        let mut recorder = Recorder::new(AutoClicker::new(vec![good], AutoClickerConfig::default()));
        let discs = [view(1, 20.0, 40.0, good)];
        for frame in 0..20 {
            recorder.poll(frame, &discs);
        }
        let recorded = recorder.events().to_vec();
        assert!(!recorded.is_empty());

        let mut replay = ScriptedInput::from_json_str(&recorder.to_json()).unwrap();
        for e in &recorded {
            assert_eq!(replay.poll(e.frame, &[]), vec![e.event]);
        }
    }
}
