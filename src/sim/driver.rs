//! Frame driver
//!
//! Turns animation-frame timestamps into fixed simulation steps. Frame
//! deltas are clamped so a backgrounded tab doesn't produce one huge step,
//! and one-shot inputs only fire on the first substep of a frame.

use super::state::GameState;
use super::tick::{TickInput, tick};
use crate::assets::AssetRegistry;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    last_time_ms: Option<f64>,
    accumulator: f32,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp. The next frame counts as the first.
    pub fn reset(&mut self) {
        self.last_time_ms = None;
        self.accumulator = 0.0;
    }

    /// Clamped seconds since the previous frame (one step on the first frame)
    pub fn frame_dt(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        }
    }

    /// Run the substeps owed for this frame. Returns how many ran.
    pub fn frame(
        &mut self,
        now_ms: f64,
        state: &mut GameState,
        input: &mut TickInput,
        assets: &AssetRegistry,
    ) -> u32 {
        let dt = self.frame_dt(now_ms);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, SIM_DT, assets);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.jump = false;
            input.start = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}
