//! Per-turn countdown
//!
//! Started by the first claw movement of a turn, paused while a grab is in
//! progress. The session decides what expiry means.

use serde::{Deserialize, Serialize};

/// Result of advancing the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStep {
    /// Not running, paused, or no visible change
    Quiet,
    /// Displayed whole-second value changed
    Ticked(u32),
    /// Countdown reached zero
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnTimer {
    duration: f32,
    remaining: f32,
    running: bool,
    paused: bool,
}

impl TurnTimer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
            running: false,
            paused: false,
        }
    }

    /// Begin the countdown. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.paused = false;
        self.remaining = self.duration;
        true
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Stop and refill for the next turn
    pub fn reset(&mut self) {
        self.running = false;
        self.paused = false;
        self.remaining = self.duration;
    }

    /// Refill without stopping (free extension)
    pub fn restart(&mut self) {
        self.remaining = self.duration;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whole seconds shown on the HUD
    pub fn display_secs(&self) -> u32 {
        self.remaining.max(0.0).ceil() as u32
    }

    pub fn advance(&mut self, dt: f32) -> TimerStep {
        if !self.running || self.paused {
            return TimerStep::Quiet;
        }
        let before = self.display_secs();
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining <= 0.0 {
            return TimerStep::Expired;
        }
        let after = self.display_secs();
        if after != before {
            TimerStep::Ticked(after)
        } else {
            TimerStep::Quiet
        }
    }
}
