//! Claw Grab entry point
//!
//! On wasm32 the game is driven from JS through `platform::web`. Natively
//! this runs a headless demo session to Game Over and logs what happened.
//!
//! Usage: `claw-grab [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use claw_grab::consts::SIM_DT;
    use claw_grab::sim::{Category, GameEvent, GamePhase, GameSession, TickInput};
    use claw_grab::platform::FrameClock;
    use claw_grab::{AssetManifest, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    let tuning = match args.next() {
        Some(path) => Tuning::load_file(&path).unwrap_or_else(|e| {
            log::error!("Could not load tuning from {}: {}", path, e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let mut session = GameSession::with_tuning(seed, tuning, AssetManifest::default());
    log::info!(
        "Headless demo, seed {}, {} token(s), {:.0}s turns",
        seed,
        session.tuning().economy.max_tokens,
        session.tuning().timer.turn_secs
    );
    let mut clock = FrameClock::new();
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    // Ten simulated minutes at 60 fps
    let frame_dt = 1.0 / 60.0;
    let max_frames = 60 * 60 * 10;
    let mut wins = 0u32;
    let mut losses = 0u32;
    for _ in 0..max_frames {
        clock.advance(&mut session, &mut input, frame_dt);
        for event in session.drain_events() {
            match event {
                GameEvent::SuccessfulGrab { .. } => wins += 1,
                GameEvent::FailedGrab { .. } => losses += 1,
                _ => {}
            }
        }
        if session.phase == GamePhase::GameOver {
            break;
        }
    }

    let elapsed = session.time_ticks as f32 * SIM_DT;
    log::info!(
        "Finished after {:.1}s: {} won, {} failed, ${} total, rank {}",
        elapsed,
        wins,
        losses,
        session.collection.running_total(),
        session.collection.player_rank().as_str()
    );
    let rares = session
        .collection
        .history()
        .iter()
        .filter(|p| p.category == Category::Rare)
        .count();
    log::info!(
        "{} prize(s) captured, {} rare",
        session.collection.captured_count(),
        rares
    );
    for (i, prize) in session.collection.top_ranked().iter().enumerate() {
        log::info!("  #{} {:?} ${} ({})", i + 1, prize.category, prize.value, prize.asset);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
