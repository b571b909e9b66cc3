//! Claw state machine
//!
//! The grab sequence is an explicit phase enum advanced by the fixed-step
//! scheduler: each phase runs for its configured duration, then hands over
//! to the next. The claw is the only actor that mutates claw state and the
//! carried item.
//!
//! ```text
//! Idle -> Descending -> Resolving -> Ascending -> Transporting -> Releasing -> Idle
//!                    \_(no zone)___/
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::item::ItemPhase;
use super::rng::RandomSource;
use super::state::{FailureKind, GameEvent, GameSession, GrabOutcome};
use super::zones::find_zone_under_claw;
use crate::tuning::ClawTuning;
use crate::{lerp, progress};

/// Phase of the grab sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClawPhase {
    Idle,
    Descending,
    Resolving,
    Ascending,
    Transporting,
    Releasing,
}

/// Bookkeeping for one grab, from trigger back to Idle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrabCycle {
    /// Item picked up at the bottom (success or doomed)
    pub target_item: Option<u32>,
    pub zone_index: Option<usize>,
    /// Seconds into the transport when a doomed item slips
    pub slip_at: Option<f32>,
    /// Item offset from the claw while carried
    pub grip_offset: Vec2,
    pub transport_from_x: f32,
    pub outcome_recorded: bool,
}

/// The claw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claw {
    pub position: Vec2,
    pub phase: ClawPhase,
    /// Seconds spent in the current phase
    pub phase_elapsed: f32,
    pub carried_item: Option<u32>,
    pub cycle: Option<GrabCycle>,
}

impl Claw {
    pub fn new(tuning: &ClawTuning) -> Self {
        Self {
            position: Vec2::new(tuning.rest_x, tuning.rest_y),
            phase: ClawPhase::Idle,
            phase_elapsed: 0.0,
            carried_item: None,
            cycle: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ClawPhase::Idle
    }

    fn enter(&mut self, phase: ClawPhase) {
        self.phase = phase;
        self.phase_elapsed = 0.0;
    }
}

impl<R: RandomSource> GameSession<R> {
    /// Start a grab at the current claw x.
    ///
    /// Ignored (returns false) unless the game is playable and the claw is
    /// Idle.
    pub fn trigger_grab(&mut self) -> bool {
        if !self.can_play() || !self.claw.is_idle() {
            return false;
        }
        log::debug!("Grab triggered at x={:.1}", self.claw.position.x);
        self.timer.pause();
        self.claw.cycle = Some(GrabCycle::default());
        self.set_claw_phase(ClawPhase::Descending);
        true
    }

    fn set_claw_phase(&mut self, phase: ClawPhase) {
        self.claw.enter(phase);
        self.emit(GameEvent::PhaseChanged { phase });
    }

    fn move_claw(&mut self, position: Vec2) {
        if self.claw.position != position {
            self.claw.position = position;
            self.emit(GameEvent::ClawMoved { position });
        }
    }

    /// Advance the grab sequence by `dt`
    pub(crate) fn step_claw(&mut self, dt: f32) {
        if self.claw.is_idle() {
            return;
        }
        self.claw.phase_elapsed += dt;
        let elapsed = self.claw.phase_elapsed;
        let (rest_y, pickup_y) = (self.tuning.claw.rest_y, self.tuning.claw.pickup_y);

        match self.claw.phase {
            ClawPhase::Idle => {}
            ClawPhase::Descending => {
                let p = progress(elapsed, self.tuning.claw.descend_secs);
                let x = self.claw.position.x;
                self.move_claw(Vec2::new(x, lerp(rest_y, pickup_y, p)));
                if p >= 1.0 {
                    self.resolve_grab();
                }
            }
            ClawPhase::Resolving => {
                if elapsed >= self.tuning.claw.grip_secs {
                    self.set_claw_phase(ClawPhase::Ascending);
                }
            }
            ClawPhase::Ascending => {
                let p = progress(elapsed, self.tuning.claw.ascend_secs);
                let x = self.claw.position.x;
                self.move_claw(Vec2::new(x, lerp(pickup_y, rest_y, p)));
                self.carry();
                if p >= 1.0 {
                    if let Some(cycle) = self.claw.cycle.as_mut() {
                        cycle.transport_from_x = self.claw.position.x;
                    }
                    self.set_claw_phase(ClawPhase::Transporting);
                }
            }
            ClawPhase::Transporting => {
                let p = progress(elapsed, self.tuning.claw.transport_secs);
                let delivery_x = self.tuning.claw.delivery_x;
                let from_x = self
                    .claw
                    .cycle
                    .as_ref()
                    .map_or(self.claw.position.x, |c| c.transport_from_x);
                let y = self.claw.position.y;
                self.move_claw(Vec2::new(lerp(from_x, delivery_x, p), y));
                self.carry();

                let slip_due = self
                    .claw
                    .cycle
                    .as_ref()
                    .and_then(|c| c.slip_at)
                    .is_some_and(|at| elapsed >= at);
                if slip_due {
                    self.slip();
                }

                if p >= 1.0 {
                    self.set_claw_phase(ClawPhase::Releasing);
                    self.begin_release();
                }
            }
            ClawPhase::Releasing => {
                if elapsed >= self.tuning.claw.release_secs {
                    self.finish_cycle();
                }
            }
        }
    }

    /// Claw reached the pickup plane: look for a zone and roll for it
    fn resolve_grab(&mut self) {
        let claw_x = self.claw.position.x;
        let Some(hit) = find_zone_under_claw(claw_x, &self.items, self.tuning.claw.hit_tolerance)
        else {
            log::debug!("No zone under claw at x={:.1}", claw_x);
            self.set_claw_phase(ClawPhase::Ascending);
            return;
        };

        let success = self.rng.chance(hit.success_probability);
        let slip_at = if success {
            None
        } else {
            let (lo, hi) = self.tuning.claw.slip_window;
            Some(self.rng.range(lo, hi) * self.tuning.claw.transport_secs)
        };
        log::debug!(
            "Zone {} of item {} (p={:.2}, d={:.2}): {}",
            hit.zone_index,
            hit.item_id,
            hit.success_probability,
            hit.distance,
            if success { "holds" } else { "will slip" }
        );

        let claw_pos = self.claw.position;
        let Some(item) = self.item_mut(hit.item_id) else {
            self.set_claw_phase(ClawPhase::Ascending);
            return;
        };
        item.phase = ItemPhase::Grabbed;
        let grip_offset = item.position - claw_pos;

        self.claw.carried_item = Some(hit.item_id);
        if let Some(cycle) = self.claw.cycle.as_mut() {
            cycle.target_item = Some(hit.item_id);
            cycle.zone_index = Some(hit.zone_index);
            cycle.slip_at = slip_at;
            cycle.grip_offset = grip_offset;
        }
        self.set_claw_phase(ClawPhase::Resolving);
    }

    /// Keep the carried item rigidly attached
    fn carry(&mut self) {
        let Some(id) = self.claw.carried_item else {
            return;
        };
        let offset = self
            .claw
            .cycle
            .as_ref()
            .map_or(Vec2::ZERO, |c| c.grip_offset);
        let anchor = self.claw.position + offset;
        match self.item_mut(id) {
            Some(item) => item.position = anchor,
            None => {
                log::warn!("Carried item {} is gone, releasing claw", id);
                self.claw.carried_item = None;
            }
        }
    }

    /// Doomed item slips out mid-transport and falls back onto the bed
    fn slip(&mut self) {
        if let Some(cycle) = self.claw.cycle.as_mut() {
            cycle.slip_at = None;
        }
        let Some(id) = self.claw.carried_item.take() else {
            return;
        };
        self.drop_back(id);
        self.record_outcome(GrabOutcome::Failure(FailureKind::Slipped));
    }

    fn drop_back(&mut self, id: u32) {
        let target = self.spawner.resting_position(&self.items, &mut self.rng);
        if let Some(item) = self.item_mut(id) {
            log::debug!("Item {} falls back to x={:.1}", id, target.x);
            item.start_fall(ItemPhase::Returning, target);
        }
    }

    /// Claw arrived over the chute
    fn begin_release(&mut self) {
        let Some(id) = self.claw.carried_item else {
            return;
        };
        let over_chute = self.tuning.claw.in_delivery_band(self.claw.position.x);
        let depth = self.tuning.claw.delivery_depth_y;

        if self.item(id).is_none() {
            log::warn!("Item {} vanished before release", id);
            self.claw.carried_item = None;
            return;
        }

        if over_chute {
            if let Some(item) = self.item_mut(id) {
                let target = Vec2::new(item.position.x, depth);
                item.start_fall(ItemPhase::Dropping, target);
            }
        } else {
            log::warn!(
                "Release at x={:.1} is outside the chute, item {} falls back",
                self.claw.position.x,
                id
            );
            self.claw.carried_item = None;
            self.drop_back(id);
            self.record_outcome(GrabOutcome::Failure(FailureKind::MissedChute));
        }
    }

    /// Close out the cycle: bank the prize or record the miss, reset the claw
    fn finish_cycle(&mut self) {
        let mut captured = false;
        if let Some(id) = self.claw.carried_item.take() {
            let dropping = self
                .item(id)
                .is_some_and(|item| item.phase == ItemPhase::Dropping);
            if dropping {
                if let Some(pos) = self.items.iter().position(|i| i.id == id) {
                    let item = self.items.remove(pos);
                    self.record_outcome(GrabOutcome::Success(item));
                    captured = true;
                }
            } else {
                log::warn!("Item {} was not dropping at release, ignoring", id);
            }
        }

        let recorded = self
            .claw
            .cycle
            .as_ref()
            .is_none_or(|c| c.outcome_recorded);
        if !recorded {
            self.record_outcome(GrabOutcome::Failure(FailureKind::Miss));
        }

        let rest = Vec2::new(self.tuning.claw.rest_x, self.tuning.claw.rest_y);
        self.move_claw(rest);
        self.claw.cycle = None;
        self.set_claw_phase(ClawPhase::Idle);
        self.timer.reset();

        if captured {
            self.replenish();
        }
    }
}
