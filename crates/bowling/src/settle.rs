//! Deciding when a throw has finished
//!
//! Two strategies: a fixed delay (the pacing of the camera dolly, 1.5 s wait
//! plus a 3 s move) or watching the bodies until they actually stop.

use serde::{Deserialize, Serialize};

/// Peak speeds over the bodies still in play
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    /// Highest linear speed, m/s
    pub linear: f32,
    /// Highest angular speed, rad/s
    pub angular: f32,
}

impl Motion {
    /// Fold one body's velocities into the peak
    pub fn include(self, linear: f32, angular: f32) -> Self {
        Self {
            linear: self.linear.max(linear),
            angular: self.angular.max(angular),
        }
    }
}

/// When a throw counts as finished
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleStrategy {
    /// A fixed time after launch, whatever the pins are doing
    FixedDelay {
        /// Seconds after launch
        seconds: f32,
    },
    /// Once everything has been still for a while
    RestVelocity {
        /// Linear speed below which a body is still
        linear_threshold: f32,
        /// Angular speed below which a body is still
        angular_threshold: f32,
        /// How long everything must stay still
        hold_seconds: f32,
        /// Give up waiting after this long
        timeout_seconds: f32,
    },
}

impl Default for SettleStrategy {
    fn default() -> Self {
        Self::FixedDelay { seconds: 4.5 }
    }
}

/// Tracks one throw against a [`SettleStrategy`]
#[derive(Debug, Clone)]
pub struct SettleDetector {
    strategy: SettleStrategy,
    elapsed: f32,
    still_for: f32,
}

impl SettleDetector {
    /// Create a detector
    pub fn new(strategy: SettleStrategy) -> Self {
        Self {
            strategy,
            elapsed: 0.0,
            still_for: 0.0,
        }
    }

    /// Strategy in use
    pub fn strategy(&self) -> SettleStrategy {
        self.strategy
    }

    /// Seconds since the last reset
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Start timing a new throw
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.still_for = 0.0;
    }

    /// Account for `delta_time` seconds ending with `motion`; `true` once settled
    pub fn update(&mut self, delta_time: f32, motion: Motion) -> bool {
        self.elapsed += delta_time.max(0.0);

        match self.strategy {
            SettleStrategy::FixedDelay { seconds } => self.elapsed >= seconds,
            SettleStrategy::RestVelocity {
                linear_threshold,
                angular_threshold,
                hold_seconds,
                timeout_seconds,
            } => {
                if motion.linear <= linear_threshold && motion.angular <= angular_threshold {
                    self.still_for += delta_time.max(0.0);
                } else {
                    self.still_for = 0.0;
                }
                self.still_for >= hold_seconds || self.elapsed >= timeout_seconds
            }
        }
    }
}
