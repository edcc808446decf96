//! Hexagon Core Demo Runner
//!
//! Plays a seeded level with scripted input, records it, and verifies the
//! replay by re-execution.
//!
//! Usage: `hexagon-core [level.json]`

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hexagon_core::{
    FRAME_TIME, TICK_RATE, VERSION,
    game::{
        events::GameEventData,
        input::InputFrame,
        state::LevelState,
        tick::{tick, LevelConfig},
    },
    replay::{record_run, verify_replay_bytes, ReplayFile},
};

/// Demo run length cap (two minutes).
const MAX_TICKS: u32 = TICK_RATE * 120;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Hexagon Core v{}", VERSION);
    info!("Tick Rate: {} Hz ({} frames per tick)", TICK_RATE, FRAME_TIME);

    let config = load_config()?;
    let seed = 12345u64;

    demo_run(&config, seed);

    info!("=== Recording Replay ===");
    let replay = record_run(&config, seed, scripted_input, MAX_TICKS);
    let bytes = replay.to_bytes()?;
    info!("Replay size: {} bytes, {} input changes, {} checkpoints",
          bytes.len(), replay.inputs.delta_count(), replay.checkpoints.len());
    info!("Duration: {:.2}s", replay.duration_seconds());

    info!("=== Verifying Replay ===");
    let report = verify_replay_bytes(&bytes)?;
    info!("Verified {} ticks, {} checkpoints", report.ticks, report.checkpoints_verified);
    info!("Final State Hash: {}", hex::encode(report.final_hash));

    let decoded = ReplayFile::from_bytes(&bytes)?;
    if let Some(result) = decoded.result {
        info!("Input Hash: {}", hex::encode(result.input_hash));
    }

    Ok(())
}

/// Level from the first argument, or the default level.
fn load_config() -> Result<LevelConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read level config {}", path))?;
            let config: LevelConfig = serde_json::from_str(&text)
                .with_context(|| format!("invalid level config {}", path))?;
            info!("Loaded level config from {}", path);
            Ok(config)
        }
        None => Ok(LevelConfig::default()),
    }
}

/// Weave back and forth, focusing on every other pass.
fn scripted_input(t: u32, _state: &LevelState) -> InputFrame {
    let pass = t / (TICK_RATE / 2);
    let frame = if pass % 2 == 0 {
        InputFrame::with_movement(1)
    } else {
        InputFrame::with_movement(-1)
    };
    if pass % 4 >= 2 {
        frame.focused()
    } else {
        frame
    }
}

/// Play the level live, logging events as they happen.
fn demo_run(config: &LevelConfig, seed: u64) {
    info!("=== Starting Demo Run ===");
    info!("RNG Seed: {}", seed);

    let mut state = LevelState::new(config, seed);
    let mut total_events = 0;

    while state.tick < MAX_TICKS {
        let input = scripted_input(state.tick, &state);
        let result = tick(&mut state, &input, config);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::PlayerDied { angle, wall_index, deadly } => {
                    info!("Player died at tick {} (angle {:.3}, wall {}, deadly: {})",
                          event.tick, angle, wall_index, deadly);
                }
                GameEventData::PatternSpawned { kind, walls } if event.tick % (TICK_RATE * 10) == 0 => {
                    info!("Tick {}: {:?} ({} walls), {} live walls",
                          event.tick, kind, walls, state.walls.len());
                }
                _ => {}
            }
        }

        if result.died {
            break;
        }
    }

    info!("=== Run Results ===");
    info!("Survived {} ticks ({:.2}s)", state.tick, state.tick as f32 / TICK_RATE as f32);
    info!("Patterns spawned: {}", state.spawner.spawned());
    info!("Total events: {}", total_events);
    info!("Final State Hash: {}", hex::encode(state.compute_hash()));
}
