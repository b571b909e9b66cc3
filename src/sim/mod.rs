//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected RNG only (seeded PCG in play, scripted in tests)
//! - Stable iteration order (by item ID)
//! - No rendering or platform dependencies

pub mod claw;
pub mod item;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;
pub mod zones;

#[cfg(test)]
mod scenarios;

pub use claw::{Claw, ClawPhase, GrabCycle};
pub use item::{Category, Item, ItemPhase};
pub use rng::{RandomSource, ScriptedRng, SimRng};
pub use spawner::ItemSpawner;
pub use state::{FailureKind, GameEvent, GamePhase, GameSession, GrabOutcome, SessionView};
pub use tick::{TickInput, tick};
pub use timer::{TimerStep, TurnTimer};
pub use zones::{HitZone, ZoneHit, ZoneTier, find_zone_under_claw, generate_zones};
