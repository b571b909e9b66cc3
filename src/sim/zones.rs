//! Hit zones: weighted grab targets on each item
//!
//! Category differences are pure data here. Each category draws a number of
//! zones from a fixed set of tiers; each tier has a probability bracket and a
//! distance band from the item center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::item::{Category, Item};
use super::rng::RandomSource;

/// Vertical offset shared by every zone (zones sit on the pickup plane)
pub const ZONE_OFFSET_Y: f32 = 0.0;
/// Extra outward spread added per pair of zones so same-tier zones separate
pub const ZONE_SPREAD_STEP: f32 = 0.5;

/// Probability bracket of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneTier {
    Core,
    Mid,
    Outer,
    Rarest,
}

impl ZoneTier {
    /// Success probability bracket [lo, hi)
    pub fn probability_range(&self) -> (f32, f32) {
        match self {
            ZoneTier::Core => (0.9, 1.0),
            ZoneTier::Mid => (0.5, 0.7),
            ZoneTier::Outer => (0.2, 0.4),
            ZoneTier::Rarest => (0.05, 0.15),
        }
    }

    /// Horizontal distance band from the item center
    pub fn distance_band(&self) -> (f32, f32) {
        match self {
            ZoneTier::Core => (0.0, 1.0),
            ZoneTier::Mid => (1.5, 3.0),
            ZoneTier::Outer => (3.0, 4.5),
            ZoneTier::Rarest => (4.5, 6.0),
        }
    }
}

/// A weighted target on an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitZone {
    pub tier: ZoneTier,
    pub offset: Vec2,
    pub success_probability: f32,
}

impl HitZone {
    pub fn new(tier: ZoneTier, dx: f32, success_probability: f32) -> Self {
        Self {
            tier,
            offset: Vec2::new(dx, ZONE_OFFSET_Y),
            success_probability,
        }
    }
}

/// Zone-count range and tier pool per category
struct ZoneRecipe {
    guaranteed_core: bool,
    extra: (u32, u32),
    pool: &'static [(ZoneTier, f32)],
}

fn recipe(category: Category) -> ZoneRecipe {
    match category {
        Category::Common => ZoneRecipe {
            guaranteed_core: false,
            extra: (3, 5),
            pool: &[(ZoneTier::Core, 1.0), (ZoneTier::Mid, 2.0), (ZoneTier::Outer, 2.0)],
        },
        Category::Uncommon => ZoneRecipe {
            guaranteed_core: true,
            extra: (2, 4),
            pool: &[(ZoneTier::Mid, 2.0), (ZoneTier::Outer, 2.0), (ZoneTier::Rarest, 1.0)],
        },
        // No core tier: rare prizes are harder to win despite their value
        Category::Rare => ZoneRecipe {
            guaranteed_core: false,
            extra: (2, 4),
            pool: &[(ZoneTier::Mid, 1.0), (ZoneTier::Outer, 2.0), (ZoneTier::Rarest, 2.0)],
        },
    }
}

/// Generate the zone layout for a freshly spawned item
pub fn generate_zones<R: RandomSource>(category: Category, rng: &mut R) -> Vec<HitZone> {
    let recipe = recipe(category);
    let mut tiers = Vec::with_capacity(recipe.extra.1 as usize + 1);
    if recipe.guaranteed_core {
        tiers.push(ZoneTier::Core);
    }

    let weights: Vec<f32> = recipe.pool.iter().map(|(_, w)| *w).collect();
    let count = rng.range_inclusive(recipe.extra.0, recipe.extra.1);
    for _ in 0..count {
        let idx = rng.weighted_index(&weights).unwrap_or(0);
        tiers.push(recipe.pool[idx].0);
    }

    tiers
        .into_iter()
        .enumerate()
        .map(|(i, tier)| {
            let (p_lo, p_hi) = tier.probability_range();
            let probability = rng.range(p_lo, p_hi);
            let (d_lo, d_hi) = tier.distance_band();
            let spread = (i / 2) as f32 * ZONE_SPREAD_STEP;
            let distance = rng.range(d_lo, d_hi) + spread;
            let side = if i % 2 == 0 { 1.0 } else { -1.0 };
            HitZone::new(tier, side * distance, probability)
        })
        .collect()
}

/// A zone found under the claw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneHit {
    pub item_id: u32,
    pub zone_index: usize,
    pub success_probability: f32,
    /// Horizontal distance between the claw and the zone center
    pub distance: f32,
}

/// First zone of an Idle item within `tolerance` of `claw_x`.
///
/// Items are considered in spawn order (lowest id first), zones in their
/// stored order.
pub fn find_zone_under_claw(claw_x: f32, items: &[Item], tolerance: f32) -> Option<ZoneHit> {
    items
        .iter()
        .filter(|item| item.is_idle())
        .filter_map(|item| {
            item.hit_zones
                .iter()
                .enumerate()
                .find_map(|(zone_index, zone)| {
                    let distance = (item.position.x + zone.offset.x - claw_x).abs();
                    (distance < tolerance).then_some(ZoneHit {
                        item_id: item.id,
                        zone_index,
                        success_probability: zone.success_probability,
                        distance,
                    })
                })
        })
        .min_by_key(|hit| hit.item_id)
}
