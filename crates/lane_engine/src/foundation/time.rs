//! Time management utilities

use std::time::Instant;

/// Wall-clock frame timer
///
/// Each [`Timer::tick`] reports the seconds elapsed since the previous tick, so
/// a frame driver can hand the simulation exactly the time that passed even
/// when frames are dropped.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the timer (call once per frame) and return the new delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.advance(now.duration_since(self.last_frame).as_secs_f32());
        self.last_frame = now;
        self.delta_time
    }

    /// Advance by a caller-supplied delta instead of reading the clock
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.delta_time = delta.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
