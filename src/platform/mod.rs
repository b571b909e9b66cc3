//! Platform abstraction layer
//!
//! Turns variable frame deltas into fixed simulation steps, and hosts the
//! browser bindings on wasm32.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GameSession, RandomSource, TickInput, tick};

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed ticks as `frame_dt` covers. One-shot inputs
    /// (trigger, pause) are applied to the first substep only.
    ///
    /// Returns the number of ticks run.
    pub fn advance<R: RandomSource>(
        &mut self,
        session: &mut GameSession<R>,
        input: &mut TickInput,
        frame_dt: f32,
    ) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(session, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.trigger = false;
            input.pause = false;
        }
        substeps
    }
}
