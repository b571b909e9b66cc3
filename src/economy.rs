//! Token economy
//!
//! A failed grab costs a token, a successful one refunds (capped at the
//! maximum). Running out schedules Game Over after a short grace period so
//! the last grab can finish animating.

use serde::{Deserialize, Serialize};

use crate::tuning::EconomyTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Economy {
    tokens: u32,
    max_tokens: u32,
    grace_secs: f32,
    /// Seconds until Game Over fires (set once tokens hit zero)
    game_over_in: Option<f32>,
    game_over: bool,
}

impl Economy {
    pub fn new(tuning: &EconomyTuning) -> Self {
        Self {
            tokens: tuning.starting_tokens.min(tuning.max_tokens),
            max_tokens: tuning.max_tokens,
            grace_secs: tuning.game_over_grace_secs,
            game_over_in: None,
            game_over: false,
        }
    }

    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// No tokens left; the session is winding down
    pub fn is_exhausted(&self) -> bool {
        self.tokens == 0
    }

    pub fn game_over_pending(&self) -> bool {
        self.game_over_in.is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Spend one token. Returns the tokens left.
    pub fn spend_token(&mut self) -> u32 {
        self.spend(1)
    }

    pub fn spend(&mut self, amount: u32) -> u32 {
        self.tokens = self.tokens.saturating_sub(amount);
        if self.tokens == 0 && self.game_over_in.is_none() && !self.game_over {
            log::info!("Out of tokens, game over in {:.1}s", self.grace_secs);
            self.game_over_in = Some(self.grace_secs);
        }
        self.tokens
    }

    /// Return one token, never above the cap. Returns the tokens left.
    pub fn refund_token(&mut self) -> u32 {
        self.refund(1)
    }

    pub fn refund(&mut self, amount: u32) -> u32 {
        if self.game_over_in.is_some() || self.game_over {
            return self.tokens;
        }
        self.tokens = self.tokens.saturating_add(amount).min(self.max_tokens);
        self.tokens
    }

    /// Advance the grace countdown. Returns true exactly once, when Game
    /// Over fires.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.game_over_in.as_mut() else {
            return false;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.game_over_in = None;
            self.game_over = true;
            return true;
        }
        false
    }
}
