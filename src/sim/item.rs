//! Prize items on the machine bed

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::zones::{HitZone, ZoneTier};

/// Prize category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Common,
    Uncommon,
    Rare,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Common, Category::Uncommon, Category::Rare];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Common => "common",
            Category::Uncommon => "uncommon",
            Category::Rare => "rare",
        }
    }
}

/// Where an item is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemPhase {
    /// Resting on the pickup plane, can be targeted
    Idle,
    /// Attached to the claw
    Grabbed,
    /// Slipped from the claw, falling back to the bed
    Returning,
    /// Released over the chute, falling to the prize slot
    Dropping,
}

/// A prize entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub position: Vec2,
    pub category: Category,
    pub value: u32,
    pub hit_zones: Vec<HitZone>,
    pub phase: ItemPhase,
    /// Visual reference (manifest entry or placeholder)
    pub asset: String,
    /// Seconds spent in a timed phase (Returning / Dropping)
    #[serde(default)]
    pub phase_elapsed: f32,
    /// Where a falling item started and where it lands
    #[serde(default)]
    pub fall_from: Vec2,
    #[serde(default)]
    pub fall_to: Vec2,
}

impl Item {
    pub fn new(
        id: u32,
        position: Vec2,
        category: Category,
        value: u32,
        hit_zones: Vec<HitZone>,
        asset: String,
    ) -> Self {
        Self {
            id,
            position,
            category,
            value,
            hit_zones,
            phase: ItemPhase::Idle,
            asset,
            phase_elapsed: 0.0,
            fall_from: position,
            fall_to: position,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ItemPhase::Idle
    }

    /// Idle, held by the claw, or falling back to the bed. Anything but an
    /// item already on its way down the chute. Used for rare exclusivity.
    pub fn is_on_field(&self) -> bool {
        matches!(
            self.phase,
            ItemPhase::Idle | ItemPhase::Grabbed | ItemPhase::Returning
        )
    }

    pub fn has_core_zone(&self) -> bool {
        self.hit_zones.iter().any(|z| z.tier == ZoneTier::Core)
    }

    /// Begin a timed fall toward `target`
    pub fn start_fall(&mut self, phase: ItemPhase, target: Vec2) {
        self.phase = phase;
        self.phase_elapsed = 0.0;
        self.fall_from = self.position;
        self.fall_to = target;
    }
}
