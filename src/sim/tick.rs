//! Session controller
//!
//! Drives the fixed-cadence frame loop: `Idle -> Running -> Finished`.
//! Time is counted in frames, so a session replays identically for the same
//! seed, config and input trace no matter how fast the host runs it.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{DiscView, SessionPhase, SessionState};
use crate::config::SimConfig;
use crate::input::InputSource;

/// An input event delivered to the session within a frame's batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer press at arena coordinates
    Click { x: f32, y: f32 },
    /// Stop the session at the next frame boundary
    Quit,
}

impl InputEvent {
    pub fn click(x: f32, y: f32) -> Self {
        Self::Click { x, y }
    }
}

/// Terminal report of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub good_clicks: u32,
    pub bad_clicks: u32,
    /// Seconds of simulated time
    pub elapsed_time: f64,
    pub frames: u64,
    /// Discs that expired from wall bumps
    pub expired: u32,
    /// Share of scoring clicks that hit good discs (0 when nothing was hit)
    pub accuracy: f64,
    pub seed: u64,
}

impl SessionReport {
    pub fn total_clicks(&self) -> u32 {
        self.good_clicks + self.bad_clicks
    }
}

fn accuracy(good: u32, bad: u32) -> f64 {
    match good + bad {
        0 => 0.0,
        total => good as f64 / total as f64,
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[+] Game Over!")?;
        writeln!(f, "[+] Good clicks: {}", self.good_clicks)?;
        writeln!(f, "[+] Bad clicks: {}", self.bad_clicks)?;
        writeln!(f, "[+] Accuracy: {:.2}%", self.accuracy * 100.0)?;
        write!(
            f,
            "[+] Simulated {:.2}s over {} frames (seed {})",
            self.elapsed_time, self.frames, self.seed
        )
    }
}

/// One bounded run of the simulation
#[derive(Debug, Clone)]
pub struct Session {
    config: SimConfig,
    seed: u64,
    rng: Pcg32,
    state: SessionState,
}

impl Session {
    /// Create an idle session; nothing is spawned until [`Session::start`]
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            state: SessionState::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable state access for scenario setup
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Seconds of simulated time
    pub fn elapsed_time(&self) -> f64 {
        self.state.frames as f64 / self.config.frame_rate
    }

    /// Fill the population, zero the counters and begin running
    pub fn start(&mut self) {
        if self.state.phase != SessionPhase::Idle {
            log::warn!("start() ignored in phase {:?}", self.state.phase);
            return;
        }

        self.state.frames = 0;
        self.state.good_clicks = 0;
        self.state.bad_clicks = 0;
        self.state.expired = 0;
        self.state.population.reset(&self.config, &mut self.rng);
        self.state.phase = SessionPhase::Running;

        log::info!(
            "Session started: seed={}, discs={}, duration={}s @ {} fps",
            self.seed,
            self.config.target_population,
            self.config.duration,
            self.config.frame_rate
        );
    }

    /// Process one frame with this frame's input batch
    ///
    /// Clicks are resolved in order against the discs as last drawn, then the
    /// population is stepped. A `Quit` ends the session on the spot: later
    /// events in the batch are dropped and the frame is not stepped.
    pub fn tick(&mut self, events: &[InputEvent]) -> SessionPhase {
        if self.state.phase != SessionPhase::Running {
            return self.state.phase;
        }

        if self.state.frames >= self.config.frame_budget() {
            self.finish();
            return self.state.phase;
        }

        for event in events {
            match *event {
                InputEvent::Click { x, y } => {
                    let hit = self
                        .state
                        .population
                        .click(Vec2::new(x, y), &self.config, &mut self.rng);
                    if let Some(class) = hit {
                        self.state.record_click(class);
                    }
                }
                InputEvent::Quit => {
                    log::info!("Quit received at frame {}", self.state.frames);
                    self.finish();
                    return self.state.phase;
                }
            }
        }

        let stats = self.state.population.advance(&self.config, &mut self.rng);
        self.state.expired += stats.expired;
        self.state.frames += 1;

        self.state.phase
    }

    /// Stop the session; counters are frozen from here on
    pub fn finish(&mut self) {
        if self.state.phase == SessionPhase::Finished {
            return;
        }
        self.state.phase = SessionPhase::Finished;
        log::info!(
            "Session finished after {} frames: good={}, bad={}, expired={}",
            self.state.frames,
            self.state.good_clicks,
            self.state.bad_clicks,
            self.state.expired
        );
    }

    /// Read-only view of the live discs for drawing
    pub fn snapshot(&self) -> Vec<DiscView> {
        self.state.population.snapshot(self.config.radius)
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            good_clicks: self.state.good_clicks,
            bad_clicks: self.state.bad_clicks,
            elapsed_time: self.elapsed_time(),
            frames: self.state.frames,
            expired: self.state.expired,
            accuracy: accuracy(self.state.good_clicks, self.state.bad_clicks),
            seed: self.seed,
        }
    }

    /// Run to completion, pulling one event batch per frame from `input`
    pub fn run<I: InputSource + ?Sized>(&mut self, input: &mut I) -> SessionReport {
        self.run_with(input, |_| {})
    }

    /// Like [`Session::run`], calling `after_tick` once each frame has been processed
    pub fn run_with<I, F>(&mut self, input: &mut I, mut after_tick: F) -> SessionReport
    where
        I: InputSource + ?Sized,
        F: FnMut(&Session),
    {
        if self.state.phase == SessionPhase::Idle {
            self.start();
        }
        while self.state.phase == SessionPhase::Running {
            let events = input.poll(self.state.frames, &self.snapshot());
            self.tick(&events);
            after_tick(self);
        }
        self.report()
    }
}
