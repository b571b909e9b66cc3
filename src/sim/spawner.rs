//! Item spawning and field replenishment

use glam::Vec2;

use super::item::{Category, Item};
use super::rng::RandomSource;
use super::zones::generate_zones;
use crate::tuning::{AssetManifest, CategoryTable, SpawnTuning, Tuning};

/// Creates prize items and keeps the bed stocked
#[derive(Debug, Clone)]
pub struct ItemSpawner {
    spawn: SpawnTuning,
    categories: CategoryTable,
    pickup_y: f32,
    manifest: AssetManifest,
    next_id: u32,
}

impl ItemSpawner {
    pub fn new(tuning: &Tuning, manifest: AssetManifest) -> Self {
        Self {
            spawn: tuning.spawn.clone(),
            categories: tuning.categories.clone(),
            pickup_y: tuning.claw.pickup_y,
            manifest,
            next_id: 1,
        }
    }

    /// Allocate a new item ID
    fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Make sure future IDs come after `id` (for hand-placed fields)
    pub fn reserve_ids_through(&mut self, id: u32) {
        self.next_id = self.next_id.max(id + 1);
    }

    /// Produce up to `n` new items.
    ///
    /// At most one Rare may be on the field: if one is already there (Idle,
    /// in the claw, or falling back) or was produced earlier in this batch,
    /// the category draw is made over the remaining categories only.
    pub fn spawn<R: RandomSource>(&mut self, n: usize, existing: &[Item], rng: &mut R) -> Vec<Item> {
        let mut rare_present = existing
            .iter()
            .any(|i| i.category == Category::Rare && i.is_on_field());
        let mut occupied: Vec<f32> = existing
            .iter()
            .filter(|i| i.is_idle())
            .map(|i| i.position.x)
            .collect();

        let mut batch = Vec::with_capacity(n);
        for _ in 0..n {
            let category = self.pick_category(rare_present, rng);
            rare_present |= category == Category::Rare;

            let spec = self.categories.spec(category);
            let value = rng.range_inclusive(spec.value_min, spec.value_max);
            let x = self.place_x(&occupied, rng);
            occupied.push(x);

            let zones = generate_zones(category, rng);
            let asset = self.pick_asset(category, rng);
            let id = self.next_item_id();
            log::debug!(
                "Spawned item {} ({:?}, ${}) at x={:.1} with {} zones",
                id,
                category,
                value,
                x,
                zones.len()
            );
            batch.push(Item::new(
                id,
                Vec2::new(x, self.pickup_y),
                category,
                value,
                zones,
                asset,
            ));
        }
        batch
    }

    /// Spawn the shortfall between the Idle count and the target floor
    pub fn replenish<R: RandomSource>(&mut self, current: &[Item], rng: &mut R) -> Vec<Item> {
        let idle = current.iter().filter(|i| i.is_idle()).count();
        let deficit = self.spawn.target_idle_items.saturating_sub(idle);
        if deficit == 0 {
            return Vec::new();
        }
        log::info!("Replenishing {} item(s) ({} idle on field)", deficit, idle);
        self.spawn(deficit, current, rng)
    }

    /// Weighted category draw, with Rare removed when `rare_blocked`
    pub fn pick_category<R: RandomSource>(&self, rare_blocked: bool, rng: &mut R) -> Category {
        let weights: Vec<f32> = Category::ALL
            .iter()
            .map(|&c| {
                if rare_blocked && c == Category::Rare {
                    0.0
                } else {
                    self.categories.spec(c).weight
                }
            })
            .collect();
        rng.weighted_index(&weights)
            .map(|i| Category::ALL[i])
            .unwrap_or(Category::Common)
    }

    /// Sample an x in the spawn band clear of `occupied`.
    ///
    /// Gives up after the configured number of attempts and accepts the
    /// last sample, so a crowded bed never blocks spawning.
    pub fn place_x<R: RandomSource>(&self, occupied: &[f32], rng: &mut R) -> f32 {
        let (lo, hi) = self.spawn.spawn_band;
        let mut x = rng.range(lo, hi);
        for attempt in 1..=self.spawn.max_attempts {
            if occupied
                .iter()
                .all(|&o| (o - x).abs() > self.spawn.min_spacing)
            {
                return x;
            }
            if attempt < self.spawn.max_attempts {
                x = rng.range(lo, hi);
            }
        }
        log::warn!(
            "No free spot after {} attempts, accepting overlap at x={:.1}",
            self.spawn.max_attempts,
            x
        );
        x
    }

    /// New resting spot on the pickup plane for an item that slipped
    pub fn resting_position<R: RandomSource>(&self, items: &[Item], rng: &mut R) -> Vec2 {
        let occupied: Vec<f32> = items
            .iter()
            .filter(|i| i.is_idle())
            .map(|i| i.position.x)
            .collect();
        Vec2::new(self.place_x(&occupied, rng), self.pickup_y)
    }

    fn pick_asset<R: RandomSource>(&self, category: Category, rng: &mut R) -> String {
        let assets = self.manifest.assets_for(category);
        if assets.is_empty() {
            return AssetManifest::placeholder(category);
        }
        let idx = rng.range_inclusive(0, assets.len() as u32 - 1) as usize;
        assets[idx].clone()
    }
}
