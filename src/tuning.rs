//! Data-driven game balance
//!
//! Every field has a default taken from [`crate::consts`], so a tuning file
//! only needs the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::item::Category;

/// Errors raised when tuning or manifest data is unusable
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{field} range inverted (min {min:.2} > max {max:.2})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{field} must be positive (got {value:.2})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("starting tokens {starting} exceed maximum {max}")]
    StartingTokens { starting: u32, max: u32 },
    #[error("category spawn weights must not all be zero")]
    NoCategoryWeight,
    #[error("{category:?} value range inverted (min {min} > max {max})")]
    ValueRange { category: Category, min: u32, max: u32 },
}

/// Claw geometry and grab sequence timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClawTuning {
    pub rest_x: f32,
    pub rest_y: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub pickup_y: f32,
    pub delivery_band: (f32, f32),
    pub delivery_x: f32,
    pub delivery_depth_y: f32,
    pub descend_secs: f32,
    pub grip_secs: f32,
    pub ascend_secs: f32,
    pub transport_secs: f32,
    pub release_secs: f32,
    pub fall_secs: f32,
    /// Fraction window of the transport in which a failed grab slips
    pub slip_window: (f32, f32),
    pub hit_tolerance: f32,
}

impl Default for ClawTuning {
    fn default() -> Self {
        Self {
            rest_x: CLAW_REST_X,
            rest_y: CLAW_REST_Y,
            min_x: CLAW_MIN_X,
            max_x: CLAW_MAX_X,
            pickup_y: PICKUP_PLANE_Y,
            delivery_band: (DELIVERY_BAND_MIN_X, DELIVERY_BAND_MAX_X),
            delivery_x: DELIVERY_X,
            delivery_depth_y: DELIVERY_DEPTH_Y,
            descend_secs: DESCEND_SECS,
            grip_secs: GRIP_SECS,
            ascend_secs: ASCEND_SECS,
            transport_secs: TRANSPORT_SECS,
            release_secs: RELEASE_SECS,
            fall_secs: ITEM_FALL_SECS,
            slip_window: SLIP_WINDOW,
            hit_tolerance: HIT_TOLERANCE,
        }
    }
}

impl ClawTuning {
    /// Whether `x` lies over the prize chute
    pub fn in_delivery_band(&self, x: f32) -> bool {
        x >= self.delivery_band.0 && x <= self.delivery_band.1
    }
}

/// Turn countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerTuning {
    pub turn_secs: f32,
}

impl Default for TimerTuning {
    fn default() -> Self {
        Self {
            turn_secs: TURN_SECS,
        }
    }
}

/// Token economy numbers
///
/// Success refunds are capped at `max_tokens`, so with the defaults a
/// successful grab is token-neutral whenever the player is at the cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub max_tokens: u32,
    pub starting_tokens: u32,
    pub refund_per_success: u32,
    pub cost_per_failure: u32,
    pub game_over_grace_secs: f32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            max_tokens: MAX_TOKENS,
            starting_tokens: MAX_TOKENS,
            refund_per_success: 1,
            cost_per_failure: 1,
            game_over_grace_secs: GAME_OVER_GRACE_SECS,
        }
    }
}

/// Field density and placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub target_idle_items: usize,
    pub min_spacing: f32,
    pub max_attempts: u32,
    pub spawn_band: (f32, f32),
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            target_idle_items: TARGET_IDLE_ITEMS,
            min_spacing: MIN_ITEM_SPACING,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
            spawn_band: (SPAWN_MIN_X, SPAWN_MAX_X),
        }
    }
}

/// Spawn weight and value range for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub weight: f32,
    pub value_min: u32,
    pub value_max: u32,
}

/// Per-category spawn table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTable {
    pub common: CategorySpec,
    pub uncommon: CategorySpec,
    pub rare: CategorySpec,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            common: CategorySpec {
                weight: 70.0,
                value_min: 5,
                value_max: 15,
            },
            uncommon: CategorySpec {
                weight: 25.0,
                value_min: 20,
                value_max: 40,
            },
            rare: CategorySpec {
                weight: 5.0,
                value_min: 50,
                value_max: 100,
            },
        }
    }
}

impl CategoryTable {
    pub fn spec(&self, category: Category) -> &CategorySpec {
        match category {
            Category::Common => &self.common,
            Category::Uncommon => &self.uncommon,
            Category::Rare => &self.rare,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub claw: ClawTuning,
    pub timer: TimerTuning,
    pub economy: EconomyTuning,
    pub spawn: SpawnTuning,
    pub categories: CategoryTable,
}

impl Tuning {
    /// Parse and validate tuning JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let claw = &self.claw;
        check_range("claw travel", claw.min_x, claw.max_x)?;
        check_range("delivery band", claw.delivery_band.0, claw.delivery_band.1)?;
        check_range("slip window", claw.slip_window.0, claw.slip_window.1)?;
        check_unit("slip window start", claw.slip_window.0)?;
        check_unit("slip window end", claw.slip_window.1)?;
        check_positive("hit tolerance", claw.hit_tolerance)?;
        for (field, secs) in [
            ("descend duration", claw.descend_secs),
            ("grip duration", claw.grip_secs),
            ("ascend duration", claw.ascend_secs),
            ("transport duration", claw.transport_secs),
            ("release duration", claw.release_secs),
            ("fall duration", claw.fall_secs),
        ] {
            if secs < 0.0 {
                return Err(TuningError::NotPositive {
                    field,
                    value: secs,
                });
            }
        }

        check_positive("turn duration", self.timer.turn_secs)?;

        let economy = &self.economy;
        check_positive("max tokens", economy.max_tokens as f32)?;
        if economy.starting_tokens > economy.max_tokens {
            return Err(TuningError::StartingTokens {
                starting: economy.starting_tokens,
                max: economy.max_tokens,
            });
        }
        if economy.game_over_grace_secs < 0.0 {
            return Err(TuningError::NotPositive {
                field: "game over grace",
                value: economy.game_over_grace_secs,
            });
        }

        let spawn = &self.spawn;
        check_positive("target idle items", spawn.target_idle_items as f32)?;
        check_positive("placement attempts", spawn.max_attempts as f32)?;
        check_range("spawn band", spawn.spawn_band.0, spawn.spawn_band.1)?;

        let mut total_weight = 0.0;
        for category in Category::ALL {
            let spec = self.categories.spec(category);
            if spec.value_min > spec.value_max {
                return Err(TuningError::ValueRange {
                    category,
                    min: spec.value_min,
                    max: spec.value_max,
                });
            }
            if spec.weight < 0.0 {
                return Err(TuningError::NotPositive {
                    field: "category weight",
                    value: spec.weight,
                });
            }
            total_weight += spec.weight;
        }
        if total_weight <= 0.0 {
            return Err(TuningError::NoCategoryWeight);
        }

        Ok(())
    }
}

fn check_range(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if min > max {
        Err(TuningError::InvertedRange { field, min, max })
    } else {
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            min: 0.0,
            max: 1.0,
            value,
        })
    }
}

/// Item visuals available per category
///
/// Supplied by the host page at startup. Empty or partial manifests are
/// fine: the spawner falls back to [`AssetManifest::placeholder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub common: Vec<String>,
    pub uncommon: Vec<String>,
    pub rare: Vec<String>,
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn assets_for(&self, category: Category) -> &[String] {
        match category {
            Category::Common => &self.common,
            Category::Uncommon => &self.uncommon,
            Category::Rare => &self.rare,
        }
    }

    /// Stand-in visual used when a category has no assets
    pub fn placeholder(category: Category) -> String {
        format!("placeholder/{}.png", category.as_str())
    }
}
