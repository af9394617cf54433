//! Disc Click entry point
//!
//! Headless runner: loads a config, drives a session from a scripted trace or
//! the built-in clicker, and prints the final report.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use disc_click::consts::MAX_CATCH_UP_TICKS;
use disc_click::input::{AutoClicker, AutoClickerConfig, InputSource, NoInput, Recorder, ScriptedInput};
use disc_click::{GameConfig, Session};

#[derive(Parser, Debug)]
#[command(name = "disc-click", version, about = "Run a disc clicking session headlessly")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// RNG seed (overrides `rng_seed` from the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Replay input events from a JSON trace
    #[arg(long, value_name = "PATH", conflicts_with = "autoclick")]
    script: Option<PathBuf>,

    /// Let the built-in clicker play, targeting the good palette
    #[arg(long)]
    autoclick: bool,

    /// Frames between automatic clicks
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..))]
    click_interval: u32,

    /// Maximum automatic aim error in pixels
    #[arg(long, default_value_t = 0.0, value_parser = parse_jitter)]
    aim_jitter: f32,

    /// Write the delivered input events to a JSON trace
    #[arg(long, value_name = "PATH")]
    record: Option<PathBuf>,

    /// Pace ticks at the configured frame rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the default configuration as JSON and exit
    #[arg(long)]
    print_default_config: bool,
}

fn parse_jitter(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("must be a finite, non-negative number of pixels, got {value}"));
    }
    Ok(value)
}

/// Sleeps so that frame N completes no earlier than N / frame_rate seconds in
struct FramePacer {
    frame_dt: Duration,
    origin: Instant,
    origin_frame: u64,
}

impl FramePacer {
    /// `None` when a frame at this rate is too long to represent as a `Duration`
    fn new(frame_rate: f64) -> Option<Self> {
        let frame_dt = Duration::try_from_secs_f64(1.0 / frame_rate).ok()?;
        Some(Self {
            frame_dt,
            origin: Instant::now(),
            origin_frame: 0,
        })
    }

    fn wait_for(&mut self, frame: u64) {
        let due = self.origin + self.frame_dt.mul_f64((frame - self.origin_frame) as f64);
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        } else if now - due > self.frame_dt * MAX_CATCH_UP_TICKS {
            // Too far behind: drop the backlog instead of bursting through it
            log::warn!("Runner fell behind at frame {}, resetting pacing", frame);
            self.origin = now;
            self.origin_frame = frame;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.print_default_config {
        println!("{}", GameConfig::default().to_json_pretty());
        return Ok(());
    }

    let game_config = GameConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let config = game_config.validate().context("validating config")?;

    let seed = cli
        .seed
        .or(game_config.rng_seed)
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Disc Click starting (seed {})", seed);

    let input: Box<dyn InputSource> = if let Some(path) = &cli.script {
        Box::new(ScriptedInput::load(path).context("loading input script")?)
    } else if cli.autoclick {
        let clicker_config = AutoClickerConfig {
            click_interval: cli.click_interval,
            aim_jitter: cli.aim_jitter,
            seed,
            ..AutoClickerConfig::default()
        };
        Box::new(AutoClicker::new(config.good_palette.clone(), clicker_config))
    } else {
        Box::new(NoInput)
    };
    let mut input = Recorder::new(input);

    let mut session = Session::new(config, seed);
    let pacer = if cli.realtime {
        let pacer = FramePacer::new(session.config().frame_rate);
        if pacer.is_none() {
            log::warn!(
                "Frame rate {} is too low to pace, running unpaced",
                session.config().frame_rate
            );
        }
        pacer
    } else {
        None
    };
    let report = match pacer {
        Some(mut pacer) => session.run_with(&mut input, |s| pacer.wait_for(s.state().frames)),
        None => session.run(&mut input),
    };

    if let Some(path) = &cli.record {
        std::fs::write(path, input.to_json())
            .with_context(|| format!("writing input trace {}", path.display()))?;
        log::info!("Recorded {} input events to {}", input.events().len(), path.display());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
