//! Game configuration
//!
//! Every tuned constant of the lane lives here. Defaults reproduce the
//! classic setup; a `bowling.toml` (or `.ron`) next to the binary overrides any
//! subset of it.

use lane_engine::config::Config;
use lane_engine::foundation::math::Vec3;
use lane_engine::physics::{BodyMaterial, HullCoverage, DEFAULT_GRAVITY, DEFAULT_MARGIN, DEFAULT_SUB_STEPS};
use serde::{Deserialize, Serialize};

use crate::settle::SettleStrategy;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Physics world settings
    pub physics: PhysicsConfig,

    /// Lane body
    pub lane: LaneConfig,

    /// Pin body
    pub pin: PinConfig,

    /// Ball body, start position and sway
    pub ball: BallConfig,

    /// Pin placement and fall detection
    pub pins: PinsConfig,

    /// Gesture to force mapping
    pub launch: LaunchConfig,

    /// When a throw counts as finished
    pub settle: SettleStrategy,

    /// Round bookkeeping
    pub round: RoundConfig,

    /// Camera dolly
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            lane: LaneConfig::default(),
            pin: PinConfig::default(),
            ball: BallConfig::default(),
            pins: PinsConfig::default(),
            launch: LaunchConfig::default(),
            settle: SettleStrategy::default(),
            round: RoundConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for GameConfig {}

/// Physics world settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity, fixed for the lifetime of the world
    pub gravity: [f32; 3],

    /// Sub-steps per frame
    pub sub_steps: u32,

    /// Collision margin applied to every body
    pub margin: f32,

    /// Which mesh triangles feed the collision hulls
    pub hull_coverage: HullCoverage,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            sub_steps: DEFAULT_SUB_STEPS,
            margin: DEFAULT_MARGIN,
            hull_coverage: HullCoverage::default(),
        }
    }
}

/// Mass and surface of one kind of body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyConfig {
    /// Mass in kilograms, zero for static bodies
    pub mass: f32,

    /// Surface properties
    pub material: BodyMaterial,
}

/// Lane settings
///
/// A `material` table, when given, must list all three coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Lane mass, zero keeps it static
    pub mass: f32,

    /// Lane surface
    pub material: BodyMaterial,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            mass: 0.0,
            material: BodyMaterial::LANE,
        }
    }
}

impl LaneConfig {
    /// Body settings for the lane prefab
    pub fn body(&self) -> BodyConfig {
        BodyConfig {
            mass: self.mass,
            material: self.material,
        }
    }
}

/// Pin settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Pin mass
    pub mass: f32,

    /// Pin surface
    pub material: BodyMaterial,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            material: BodyMaterial::PIN,
        }
    }
}

impl PinConfig {
    /// Body settings for the pin prefab
    pub fn body(&self) -> BodyConfig {
        BodyConfig {
            mass: self.mass,
            material: self.material,
        }
    }
}

/// Ball settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    /// Thrown ball mass
    pub mass: f32,

    /// Thrown ball surface
    pub material: BodyMaterial,

    /// Where the preview ball sits before it starts swaying
    pub start_position: [f32; 3],

    /// Sideways sway either side of the start position
    pub sway_amplitude: f32,

    /// Seconds for one sweep from one side to the other
    pub sway_leg_seconds: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            mass: 3.0,
            material: BodyMaterial::BALL,
            start_position: [0.0, 0.2, -2.4],
            sway_amplitude: 0.5,
            sway_leg_seconds: 1.5,
        }
    }
}

impl BallConfig {
    /// Body settings for the ball prefab
    pub fn body(&self) -> BodyConfig {
        BodyConfig {
            mass: self.mass,
            material: self.material,
        }
    }

    /// Start position as a vector
    pub fn start(&self) -> Vec3 {
        Vec3::from(self.start_position)
    }
}

/// Pin placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinsConfig {
    /// Height added to each slot so fresh pins drop in instead of overlapping the lane
    pub spawn_lift: f32,

    /// A pin whose origin is below this height counts as fallen
    pub fallen_height: f32,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            spawn_lift: 0.2,
            fallen_height: 0.0,
        }
    }
}

/// Gesture to force mapping
///
/// `force = (0, 0, power / power_divisor * force_scale)`, applied at
/// `force_offset` from the ball's centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Releases with less drag than this (pixels) are ignored
    pub min_power: f32,

    /// Pixel drag to launch strength divisor
    pub power_divisor: f32,

    /// Launch strength to newtons
    pub force_scale: f32,

    /// Where the force hits the ball, relative to its centre
    pub force_offset: [f32; 3],
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            min_power: 1.0,
            power_divisor: 30.0,
            force_scale: 100.0,
            force_offset: [0.2, 0.2, 0.0],
        }
    }
}

impl LaunchConfig {
    /// Force for a drag of `power` pixels
    pub fn force(&self, power: f32) -> Vec3 {
        Vec3::new(0.0, 0.0, power / self.power_divisor * self.force_scale)
    }

    /// Force offset as a vector
    pub fn offset(&self) -> Vec3 {
        Vec3::from(self.force_offset)
    }
}

/// Round bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Remove the thrown ball when the player retries
    ///
    /// Off, thrown balls stay on the lane and pile up across rounds.
    pub clear_thrown_ball_on_retry: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            clear_thrown_ball_on_retry: true,
        }
    }
}

/// Camera dolly along the lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera z when the session starts
    pub start_z: f32,

    /// Camera z once it has followed a throw
    pub follow_z: f32,

    /// Seconds after launch before the camera starts moving
    pub follow_delay: f32,

    /// Seconds to reach `follow_z`
    pub follow_seconds: f32,

    /// Camera z after a retry
    pub return_z: f32,

    /// Seconds to reach `return_z`
    pub return_seconds: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_z: -3.0,
            follow_z: 1.0,
            follow_delay: 1.5,
            follow_seconds: 3.0,
            return_z: -3.1,
            return_seconds: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let config = GameConfig::default();

        assert_eq!(config.physics.gravity, [0.0, -9.8, 0.0]);
        assert_eq!(config.physics.sub_steps, 10);
        assert_relative_eq!(config.physics.margin, 0.01);
        assert_eq!(config.physics.hull_coverage, HullCoverage::AllTriangles);
        assert_relative_eq!(config.lane.mass, 0.0);
        assert_relative_eq!(config.pin.mass, 1.0);
        assert_relative_eq!(config.ball.mass, 3.0);
        assert_eq!(config.ball.start(), Vec3::new(0.0, 0.2, -2.4));
        assert_relative_eq!(config.pins.spawn_lift, 0.2);
        assert!(config.round.clear_thrown_ball_on_retry);
        assert_eq!(config.settle, SettleStrategy::FixedDelay { seconds: 4.5 });
    }

    #[test]
    fn test_launch_force_mapping() {
        let launch = LaunchConfig::default();
        assert_relative_eq!(launch.force(30.0), Vec3::new(0.0, 0.0, 100.0));
        assert_relative_eq!(launch.force(60.0), Vec3::new(0.0, 0.0, 200.0));
        assert_eq!(launch.offset(), Vec3::new(0.2, 0.2, 0.0));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = std::env::temp_dir().join(format!("bowling_partial_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[launch]\nmin_power = 5.0\n\n[physics]\nhull_coverage = \"skip_last_triangle\"\n\n[settle.rest_velocity]\nlinear_threshold = 0.05\nangular_threshold = 0.1\nhold_seconds = 0.5\ntimeout_seconds = 10.0\n",
        )
        .unwrap();

        let config = GameConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_relative_eq!(config.launch.min_power, 5.0);
        assert_relative_eq!(config.launch.power_divisor, 30.0);
        assert_eq!(config.physics.hull_coverage, HullCoverage::SkipLastTriangle);
        assert_eq!(config.physics.sub_steps, 10);
        assert!(matches!(config.settle, SettleStrategy::RestVelocity { .. }));
        assert_eq!(config.pin, GameConfig::default().pin);
    }

    #[test]
    fn test_partial_body_table_keeps_default_material() {
        let config: GameConfig = ron::from_str("(pin: (mass: 1.5), lane: ())").unwrap();

        assert_relative_eq!(config.pin.mass, 1.5);
        assert_eq!(config.pin.material, BodyMaterial::PIN);
        assert_eq!(config.lane, LaneConfig::default());
        assert_eq!(config.pin.body().material, BodyMaterial::PIN);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = std::env::temp_dir().join(format!("bowling_round_trip_{}.ron", std::process::id()));
        let mut config = GameConfig::default();
        config.round.clear_thrown_ball_on_retry = false;
        config.camera.follow_z = 2.0;

        config.save_to_file(&path).unwrap();
        let loaded = GameConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }
}
