//! Frame timing: fixed-step accumulator and FPS counter

use crate::consts::SIM_DT;

/// Turns variable frame time into a whole number of fixed steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Fixed step length in seconds
    step: f32,
    /// Unconsumed frame time
    accumulator: f64,
    /// Monotonic count of steps run
    steps: u64,
    /// Per-frame step cap; `None` replays every queued step
    max_steps: Option<u32>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT, None)
    }
}

impl FrameClock {
    pub fn new(step: f32, max_steps: Option<u32>) -> Self {
        Self {
            step,
            accumulator: 0.0,
            steps: 0,
            max_steps,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Leftover time not yet consumed by a step
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Add a frame's wall-clock delta and run `update` once per whole step
    ///
    /// Returns the number of steps run this frame. When the cap is hit,
    /// the whole steps still queued are dropped and only the fractional
    /// remainder carries over.
    pub fn advance<F: FnMut(f32)>(&mut self, frame_dt: f64, mut update: F) -> u32 {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            log::warn!("Ignoring invalid frame delta {frame_dt}");
            return 0;
        }

        self.accumulator += frame_dt;
        let step = self.step as f64;
        let mut ran = 0;

        while self.accumulator >= step {
            if let Some(max) = self.max_steps {
                if ran >= max {
                    let dropped = (self.accumulator / step).floor();
                    self.accumulator -= dropped * step;
                    log::debug!("Frame over budget: dropped {dropped} fixed steps");
                    break;
                }
            }

            self.accumulator -= step;
            self.steps += 1;
            ran += 1;
            update(self.step);
        }

        ran
    }

    /// Forget any queued time (after a pause or resize)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Frames averaged by [`FpsCounter`]
const FPS_WINDOW: usize = 60;

/// Rolling frames-per-second over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame presented at `time` seconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_seen += 1;

        if self.frames_seen > FPS_WINDOW {
            // Slot about to be overwritten holds the oldest frame
            let oldest = self.frame_times[self.frame_index];
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_steps() {
        let mut clock = FrameClock::default();
        let mut calls = 0;
        assert_eq!(clock.advance(0.01, |_| calls += 1), 0);
        assert_eq!(clock.advance(0.01, |_| calls += 1), 1);
        assert_eq!(calls, 1);
        assert_eq!(clock.steps(), 1);
        assert!((clock.accumulator() - (0.02 - 1.0 / 64.0)).abs() < 1e-9);
    }

    #[test]
    fn test_passes_fixed_step() {
        let mut clock = FrameClock::default();
        let mut seen = Vec::new();
        clock.advance(3.0 / 64.0, |dt| seen.push(dt));
        assert_eq!(seen, vec![SIM_DT; 3]);
    }

    #[test]
    fn test_unbounded_replays_stall() {
        let mut clock = FrameClock::new(SIM_DT, None);
        assert_eq!(clock.advance(1.0, |_| {}), 64);
        assert_eq!(clock.steps(), 64);
    }

    #[test]
    fn test_cap_drops_backlog() {
        let mut clock = FrameClock::new(SIM_DT, Some(8));
        let ran = clock.advance(1.0 + 0.5 / 64.0, |_| {});
        assert_eq!(ran, 8);
        assert_eq!(clock.steps(), 8);
        // Only the half step remains
        assert!((clock.accumulator() - 0.5 / 64.0).abs() < 1e-9);
        assert_eq!(clock.advance(0.0, |_| {}), 0);
    }

    #[test]
    fn test_reset_discards_backlog() {
        let mut clock = FrameClock::new(SIM_DT, None);
        clock.advance(0.01, |_| {});
        clock.reset();
        assert_eq!(clock.accumulator(), 0.0);
        // 0.01 + 0.01 would have crossed one step without the reset
        assert_eq!(clock.advance(0.01, |_| {}), 0);
        assert_eq!(clock.steps(), 0);
    }

    #[test]
    fn test_rejects_bad_delta() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(-1.0, |_| {}), 0);
        assert_eq!(clock.advance(f64::NAN, |_| {}), 0);
        assert_eq!(clock.accumulator(), 0.0);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for i in 0..=120 {
            fps.record(i as f64 / 60.0);
        }
        assert_eq!(fps.fps(), 60);
    }
}
