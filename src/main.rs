//! Cannon Volley entry point
//!
//! Headless demonstration round: an auto-gunner clicks on target centers
//! while the session runs the fixed-tick loop, then the round summary is
//! printed as JSON. Losing to the clock is a normal exit.

use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Serialize;

use cannon_volley::consts::TICK_MS;
use cannon_volley::sim::{GameEvent, Outcome};
use cannon_volley::{GameConfig, Session};

/// Demo options parsed from the command line
struct DemoArgs {
    seed: Option<u64>,
    realtime: bool,
    shot_every: u64,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            seed: None,
            realtime: false,
            shot_every: 30,
        }
    }
}

fn parse_args() -> DemoArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = DemoArgs::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" | "-s" => {
                if let Some(val) = args.get(i + 1) {
                    if let Ok(n) = val.parse() {
                        parsed.seed = Some(n);
                    }
                    i += 1;
                }
            }
            "--shot-every" => {
                if let Some(val) = args.get(i + 1) {
                    if let Ok(n) = val.parse() {
                        parsed.shot_every = n;
                    }
                    i += 1;
                }
            }
            "--realtime" => parsed.realtime = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }
    parsed
}

fn print_help() {
    println!(
        r#"Cannon Volley - headless demo round

USAGE:
    cannon-volley [OPTIONS]

OPTIONS:
    -s, --seed N         RNG seed for the round (default: clock-derived)
    --shot-every TICKS   Auto-gunner cadence in ticks (default: 30)
    --realtime           Pace the loop at the 16 ms tick interval
    -h, --help           Show this help
"#
    );
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// End-of-round summary printed as JSON
#[derive(Serialize)]
struct RoundSummary {
    seed: u64,
    won: bool,
    elapsed_ticks: u64,
    targets_left: usize,
    shots_fired: u32,
    message: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args();
    let seed = args.seed.unwrap_or_else(clock_seed);
    let shot_every = args.shot_every.max(1);
    log::info!("Cannon Volley starting with seed {seed}");

    let mut session = Session::new(GameConfig::default(), seed)
        .with_context(|| format!("set up round with seed {seed}"))?;

    let tick_interval = Duration::from_millis(TICK_MS);
    let mut ticks: u64 = 0;
    let mut shots: u32 = 0;
    let mut end_message = String::new();

    while !session.is_over() {
        let frame_start = Instant::now();

        // The auto-gunner: click the first live target's current center
        if ticks % shot_every == 0 {
            if let Some(target) = session.state().round.targets.first() {
                let aim = target.center();
                session.on_click(aim.x, aim.y);
            }
        }

        for event in session.advance() {
            match event {
                GameEvent::CannonFired { .. } => shots += 1,
                GameEvent::RoundEnded { message, .. } => {
                    log::info!("{message}");
                    end_message = message;
                }
                _ => {}
            }
        }
        ticks += 1;

        if args.realtime {
            let elapsed = frame_start.elapsed();
            if elapsed < tick_interval {
                std::thread::sleep(tick_interval - elapsed);
            }
        }
    }

    let summary = RoundSummary {
        seed,
        won: session.outcome() == Outcome::Won,
        elapsed_ticks: session.state().round.elapsed_ticks,
        targets_left: session.state().round.targets.len(),
        shots_fired: shots,
        message: end_message,
    };
    let json = serde_json::to_string_pretty(&summary).context("render round summary")?;
    println!("{json}");
    Ok(())
}
