//! Game session and outbound events
//!
//! The session owns every piece of mutable game state. Collaborators feed it
//! input through [`super::tick`] and observe it through the drained event
//! queue and [`SessionView`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::claw::{Claw, ClawPhase};
use super::item::Item;
use super::rng::{RandomSource, SimRng};
use super::spawner::ItemSpawner;
use super::timer::TurnTimer;
use crate::collection::{CollectedItem, Collection, PlayerRank};
use crate::economy::Economy;
use crate::tuning::{AssetManifest, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting input
    Playing,
    /// Frozen, input ignored
    Paused,
    /// Out of tokens
    GameOver,
}

/// Why a grab failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Nothing under the claw
    Miss,
    /// Item slipped out during transport
    Slipped,
    /// Claw released away from the chute
    MissedChute,
}

/// Result of one grab cycle
#[derive(Debug, Clone)]
pub enum GrabOutcome {
    Success(Item),
    Failure(FailureKind),
}

/// Notifications for rendering, HUD and flow control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    ClawMoved { position: Vec2 },
    PhaseChanged { phase: ClawPhase },
    SuccessfulGrab { item: CollectedItem },
    FailedGrab { reason: FailureKind },
    TimerTick { remaining: u32 },
    TurnStarted,
    ItemsSpawned { ids: Vec<u32> },
    GameOver { total: u64 },
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameSession<R = SimRng> {
    pub(crate) tuning: Tuning,
    manifest: AssetManifest,
    pub(crate) rng: R,
    pub phase: GamePhase,
    pub claw: Claw,
    /// Items on the field, in spawn order
    pub items: Vec<Item>,
    pub(crate) spawner: ItemSpawner,
    pub timer: TurnTimer,
    pub economy: Economy,
    pub collection: Collection,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameSession<SimRng> {
    /// New session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default(), AssetManifest::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning, manifest: AssetManifest) -> Self {
        Self::with_rng(tuning, manifest, SimRng::new(seed))
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Start over with the same seed and tuning.
    ///
    /// Anything in flight (grab sequence, falling items, game-over grace)
    /// is discarded with the old state.
    pub fn reset(&mut self) {
        let seed = self.seed();
        log::info!("Resetting session (seed {})", seed);
        *self = Self::with_tuning(seed, self.tuning.clone(), self.manifest.clone());
    }
}

impl<R: RandomSource> GameSession<R> {
    /// New session drawing from `rng`, with a freshly stocked field
    pub fn with_rng(tuning: Tuning, manifest: AssetManifest, rng: R) -> Self {
        let mut session = Self::empty(tuning, manifest, rng);
        session.replenish();
        log::info!(
            "Session started: {} items, {} tokens",
            session.items.len(),
            session.economy.tokens()
        );
        session
    }

    /// New session with a hand-placed field (no initial spawn)
    pub fn with_field(tuning: Tuning, rng: R, items: Vec<Item>) -> Self {
        let mut session = Self::empty(tuning, AssetManifest::default(), rng);
        let max_id = items.iter().map(|i| i.id).max().unwrap_or(0);
        session.spawner.reserve_ids_through(max_id);
        session.items = items;
        session.normalize_order();
        session
    }

    fn empty(tuning: Tuning, manifest: AssetManifest, rng: R) -> Self {
        Self {
            claw: Claw::new(&tuning.claw),
            spawner: ItemSpawner::new(&tuning, manifest.clone()),
            timer: TurnTimer::new(tuning.timer.turn_secs),
            economy: Economy::new(&tuning.economy),
            collection: Collection::default(),
            phase: GamePhase::Playing,
            items: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            tuning,
            manifest,
            rng,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Whether a new grab may start
    pub fn can_play(&self) -> bool {
        self.phase == GamePhase::Playing && !self.economy.is_exhausted()
    }

    pub fn item(&self, id: u32) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: u32) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn idle_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.is_idle())
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Pointer moved to `x` (play-field percent).
    ///
    /// Only honored while playing with the claw Idle. The first move of a
    /// turn starts the countdown.
    pub fn pointer_moved(&mut self, x: f32) -> bool {
        if self.phase != GamePhase::Playing || !self.claw.is_idle() {
            return false;
        }
        let x = x.clamp(self.tuning.claw.min_x, self.tuning.claw.max_x);
        let position = Vec2::new(x, self.claw.position.y);
        if self.claw.position != position {
            self.claw.position = position;
            self.emit(GameEvent::ClawMoved { position });
        }
        if !self.economy.is_exhausted() && self.timer.start() {
            self.emit(GameEvent::TurnStarted);
            self.emit(GameEvent::TimerTick {
                remaining: self.timer.display_secs(),
            });
        }
        true
    }

    /// Flip between Playing and Paused
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
    }

    /// Apply a grab result to the ledgers. Only the first outcome of a cycle
    /// counts.
    pub(crate) fn record_outcome(&mut self, outcome: GrabOutcome) {
        if let Some(cycle) = self.claw.cycle.as_mut() {
            if cycle.outcome_recorded {
                log::warn!("Grab outcome already recorded, ignoring {:?}", outcome);
                return;
            }
            cycle.outcome_recorded = true;
        }

        match outcome {
            GrabOutcome::Success(item) => {
                self.economy.refund(self.tuning.economy.refund_per_success);
                let rank = self.collection.record(&item);
                log::info!(
                    "Won item {} ({:?}, ${}), total ${}{}",
                    item.id,
                    item.category,
                    item.value,
                    self.collection.running_total(),
                    rank.map(|r| format!(", ranked #{r}")).unwrap_or_default()
                );
                self.emit(GameEvent::SuccessfulGrab {
                    item: CollectedItem::from(&item),
                });
            }
            GrabOutcome::Failure(reason) => {
                let left = self.economy.spend(self.tuning.economy.cost_per_failure);
                log::info!("Grab failed ({:?}), {} token(s) left", reason, left);
                self.emit(GameEvent::FailedGrab { reason });
            }
        }
    }

    /// Top the field back up to the target floor
    pub(crate) fn replenish(&mut self) {
        let fresh = self.spawner.replenish(&self.items, &mut self.rng);
        if fresh.is_empty() {
            return;
        }
        let ids = fresh.iter().map(|i| i.id).collect();
        self.items.extend(fresh);
        self.normalize_order();
        self.emit(GameEvent::ItemsSpawned { ids });
    }

    /// Keep items sorted by ID so hit scans follow spawn order
    pub fn normalize_order(&mut self) {
        self.items.sort_by_key(|i| i.id);
    }

    /// Serializable snapshot for renderers and the HUD
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            phase: self.phase,
            claw: &self.claw,
            items: &self.items,
            tokens: self.economy.tokens(),
            max_tokens: self.economy.max_tokens(),
            time_remaining: self.timer.display_secs(),
            timer_running: self.timer.is_running(),
            top_ranked: self.collection.top_ranked(),
            running_total: self.collection.running_total(),
            rank: self.collection.player_rank(),
        }
    }
}

/// Read-only snapshot of a session
#[derive(Debug, Serialize)]
pub struct SessionView<'a> {
    pub phase: GamePhase,
    pub claw: &'a Claw,
    pub items: &'a [Item],
    pub tokens: u32,
    pub max_tokens: u32,
    pub time_remaining: u32,
    pub timer_running: bool,
    pub top_ranked: &'a [CollectedItem],
    pub running_total: u64,
    pub rank: PlayerRank,
}
