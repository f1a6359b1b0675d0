//! One bowling session: lane, pins, ball, camera and the round driving them
//!
//! The session owns all game state; there is no global. A frame driver calls
//! [`Session::handle_input`] for input between frames and [`Session::update`]
//! once per frame.

use lane_engine::foundation::math::Transform;
use lane_engine::physics::StepReport;
use lane_engine::scene::SceneNode;

use crate::assets::{pin_slot_name, AssetSource, LANE, PIN_SLOTS};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::InputEvent;
use crate::prefabs::Prefabs;
use crate::round::{InputOutcome, PinSlot, Round, RoundState};
use crate::tween::{CameraRig, Ease, Tween};
use crate::world::GameWorld;

/// A running game
pub struct Session {
    config: GameConfig,
    world: GameWorld,
    prefabs: Prefabs,
    round: Round,
    sway: Tween,
    camera: CameraRig,
}

impl Session {
    /// Build the lane, rack the pins and place the preview ball
    ///
    /// Fails if any required node is missing or has no usable mesh.
    pub fn new(config: GameConfig, assets: &dyn AssetSource) -> Result<Self, GameError> {
        let prefabs = Prefabs::load(assets, &config)?;
        let slots = (1..=PIN_SLOTS)
            .map(|index| {
                let name = pin_slot_name(index);
                let marker = assets.find(&name).ok_or_else(|| GameError::missing(&name))?;
                Ok(PinSlot {
                    rest_position: marker.transform.position,
                    name,
                })
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        let mut world = GameWorld::new(&config.physics);
        world.spawn_body(LANE, prefabs.lane.model.clone(), prefabs.lane.body());

        let start = config.ball.start();
        let preview = world.add_visual(SceneNode::new(
            prefabs.ball.model.name.clone(),
            Transform::from_position(start),
            prefabs.ball.model.clone(),
        ));

        let mut round = Round::new(&config, slots, preview);
        round.rack_pins(&mut world, &prefabs);

        let amplitude = config.ball.sway_amplitude;
        let sway = Tween::new(start.x + amplitude, start.x - amplitude, config.ball.sway_leg_seconds)
            .with_ease(Ease::Power2InOut)
            .yoyo()
            .repeat_forever();
        let camera = CameraRig::new(config.camera.start_z);

        log::info!(
            "Session ready: {} nodes, {} bodies",
            world.scene().node_count(),
            world.physics().body_count()
        );

        Ok(Self {
            config,
            world,
            prefabs,
            round,
            sway,
            camera,
        })
    }

    /// Feed one input event; call between frames only
    pub fn handle_input(&mut self, event: InputEvent) -> Result<InputOutcome, GameError> {
        let outcome = self.round.handle_input(event, &mut self.world, &self.prefabs)?;

        let camera = &self.config.camera;
        match outcome {
            InputOutcome::Launched { .. } => {
                self.camera
                    .dolly_to(camera.follow_z, camera.follow_delay, camera.follow_seconds);
            }
            InputOutcome::Retried(_) => {
                self.camera.dolly_to(camera.return_z, 0.0, camera.return_seconds);
            }
            InputOutcome::Tracked | InputOutcome::Rejected(_) => {}
        }
        Ok(outcome)
    }

    /// Advance one frame of `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) -> StepReport {
        let x = self.sway.advance(delta_time);
        self.round.set_preview_x(&mut self.world, x);
        self.camera.update(delta_time);

        let report = self.world.step(delta_time);
        if report.skipped > 0 {
            log::trace!("{} nodes not synchronized this frame", report.skipped);
        }
        self.round.update(delta_time, &self.world);
        report
    }

    /// Round state
    pub fn state(&self) -> RoundState {
        self.round.state()
    }

    /// The round
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Scene and physics
    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    /// Camera z along the lane
    pub fn camera_z(&self) -> f32 {
        self.camera.z()
    }

    /// Configuration the session was built with
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
