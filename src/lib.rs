//! Claw Grab - A retro claw machine arcade game
//!
//! Core modules:
//! - `sim`: Deterministic grab resolution engine (claw, items, hit zones, timer)
//! - `economy`: Turn tokens and game-over gating
//! - `collection`: Captured prizes, top-N ranking and running total
//! - `tuning`: Data-driven game balance
//! - `platform`: Fixed-timestep frame clock and browser bindings

pub mod collection;
pub mod economy;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use collection::{CollectedItem, Collection, PlayerRank};
pub use economy::Economy;
pub use tuning::{AssetManifest, Tuning, TuningError};

/// Game configuration constants
///
/// All coordinates are percentages of the play-field (0-100 on both axes,
/// y grows downward).
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Claw rest position
    pub const CLAW_REST_X: f32 = 50.0;
    pub const CLAW_REST_Y: f32 = 10.0;
    /// Horizontal travel range of the claw while idle
    pub const CLAW_MIN_X: f32 = 5.0;
    pub const CLAW_MAX_X: f32 = 95.0;

    /// Vertical coordinate where items rest and the claw detects hits
    pub const PICKUP_PLANE_Y: f32 = 70.0;

    /// Prize delivery chute (left edge of the machine)
    pub const DELIVERY_BAND_MIN_X: f32 = 0.0;
    pub const DELIVERY_BAND_MAX_X: f32 = 12.0;
    pub const DELIVERY_X: f32 = 5.0;
    pub const DELIVERY_DEPTH_Y: f32 = 85.0;

    /// Phase durations (seconds)
    pub const DESCEND_SECS: f32 = 1.0;
    pub const GRIP_SECS: f32 = 0.3;
    pub const ASCEND_SECS: f32 = 1.0;
    pub const TRANSPORT_SECS: f32 = 1.0;
    pub const RELEASE_SECS: f32 = 0.5;
    pub const ITEM_FALL_SECS: f32 = 0.8;
    /// Mid-transit drop happens within this fraction window of the transport
    pub const SLIP_WINDOW: (f32, f32) = (0.15, 0.85);

    /// Horizontal distance under which a zone counts as under the claw
    pub const HIT_TOLERANCE: f32 = 2.0;

    /// Turn countdown (seconds)
    pub const TURN_SECS: f32 = 20.0;

    /// Token economy
    pub const MAX_TOKENS: u32 = 3;
    pub const GAME_OVER_GRACE_SECS: f32 = 1.0;

    /// Field density
    pub const TARGET_IDLE_ITEMS: usize = 6;
    pub const MIN_ITEM_SPACING: f32 = 12.0;
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 30;
    /// Horizontal band where items may spawn (right of the delivery chute)
    pub const SPAWN_MIN_X: f32 = 20.0;
    pub const SPAWN_MAX_X: f32 = 90.0;

    /// Number of captured prizes kept in the ranking
    pub const TOP_RANKED_LEN: usize = 3;
}

/// Linear interpolation between `a` and `b` by `t` (clamped to [0, 1])
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Progress of `elapsed` through `duration` in [0, 1]
#[inline]
pub fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}
