//! Round state machine
//!
//! ```text
//! Idle ──release, power ≥ min──> Launching ──ball spawned──> Resolving
//!  ▲                                                            │ settled
//!  └───────────────retry confirmed─────────── AwaitingRetry <───┘
//! ```
//!
//! Input is fed in synchronously between frames; [`Round::update`] runs once per
//! frame after physics has stepped.

use lane_engine::foundation::math::{Transform, Vec3};
use lane_engine::scene::{NodeId, SceneNode};

use crate::config::{GameConfig, LaunchConfig, PinsConfig};
use crate::error::GameError;
use crate::input::{DragGesture, InputEvent};
use crate::prefabs::Prefabs;
use crate::settle::SettleDetector;
use crate::world::GameWorld;

/// Name given to thrown balls
pub const THROWN_BALL: &str = "Thrown_Ball";

/// Where a round is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Preview ball swaying, waiting for a throw
    Idle,
    /// A throw was accepted and the ball is being put on the lane
    Launching,
    /// Ball and pins simulating
    Resolving,
    /// Everything settled; waiting for the player to retry
    AwaitingRetry,
}

/// Why an input did nothing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Drag too short to count as a throw
    BelowThreshold {
        /// Power of the rejected drag
        power: f32,
    },
    /// A ball is already on the lane
    BallInFlight,
    /// Retry confirmed while the throw is still playing out
    NotAwaitingRetry,
}

/// What a retry found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryReport {
    /// Pins still in the scene before the retry
    pub pins_present: usize,
    /// Of those, pins found below the fallen height and removed
    pub pins_fallen: usize,
    /// Whether a fresh rack of pins was set up
    pub rack_reset: bool,
    /// Pins knocked down since the rack was last set up, this retry included
    pub down_this_rack: usize,
}

/// Outcome of one input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    /// Pointer position recorded
    Tracked,
    /// Ball thrown
    Launched {
        /// Drag power of the throw
        power: f32,
    },
    /// Retry done, round back to idle
    Retried(RetryReport),
    /// Nothing happened
    Rejected(Rejection),
}

/// A named pin position
#[derive(Debug, Clone, PartialEq)]
pub struct PinSlot {
    /// Node name, `Pin_Pos_1` to `Pin_Pos_10`
    pub name: String,
    /// Where a pin rests in this slot
    pub rest_position: Vec3,
}

#[derive(Debug)]
enum Preview {
    InScene(NodeId),
    // Off the lane while a thrown ball is in play
    Stashed(SceneNode),
}

/// Round state and the policy around it
#[derive(Debug)]
pub struct Round {
    state: RoundState,
    gesture: DragGesture,
    slots: Vec<PinSlot>,
    preview: Preview,
    thrown: Option<NodeId>,
    spent_balls: Vec<NodeId>,
    settle: SettleDetector,
    down_this_rack: usize,
    launch: LaunchConfig,
    pins: PinsConfig,
    clear_thrown_ball_on_retry: bool,
}

impl Round {
    /// Idle round around an already placed preview ball
    pub fn new(config: &GameConfig, slots: Vec<PinSlot>, preview: NodeId) -> Self {
        Self {
            state: RoundState::Idle,
            gesture: DragGesture::default(),
            slots,
            preview: Preview::InScene(preview),
            thrown: None,
            spent_balls: Vec::new(),
            settle: SettleDetector::new(config.settle),
            down_this_rack: 0,
            launch: config.launch.clone(),
            pins: config.pins.clone(),
            clear_thrown_ball_on_retry: config.round.clear_thrown_ball_on_retry,
        }
    }

    /// Current state
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Pin slots in numbering order
    pub fn slots(&self) -> &[PinSlot] {
        &self.slots
    }

    /// Ball thrown this round, if any
    pub fn thrown_ball(&self) -> Option<NodeId> {
        self.thrown
    }

    /// Balls from earlier rounds left on the lane
    pub fn spent_balls(&self) -> &[NodeId] {
        &self.spent_balls
    }

    /// Preview ball node, `None` while it is off the lane
    pub fn preview(&self) -> Option<NodeId> {
        match self.preview {
            Preview::InScene(node) => Some(node),
            Preview::Stashed(_) => None,
        }
    }

    /// Pins knocked down since the rack was last set up
    pub fn down_this_rack(&self) -> usize {
        self.down_this_rack
    }

    /// Set up a full rack: one fresh pin per slot, lifted clear of the lane
    pub fn rack_pins(&mut self, world: &mut GameWorld, prefabs: &Prefabs) {
        let lift = Vec3::new(0.0, self.pins.spawn_lift, 0.0);
        for slot in &self.slots {
            let transform = Transform::from_position(slot.rest_position + lift);
            world.spawn_body(&slot.name, prefabs.pin.model.clone(), &prefabs.pin.body_at(transform));
        }
        self.down_this_rack = 0;
        log::info!("Racked {} pins", self.slots.len());
    }

    /// Move the preview ball sideways, on or off the lane
    pub fn set_preview_x(&mut self, world: &mut GameWorld, x: f32) {
        match &mut self.preview {
            Preview::InScene(node) => {
                if let Some(node) = world.scene_mut().node_mut(*node) {
                    node.transform.position.x = x;
                }
            }
            Preview::Stashed(node) => node.transform.position.x = x,
        }
    }

    /// Feed one input event
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        world: &mut GameWorld,
        prefabs: &Prefabs,
    ) -> Result<InputOutcome, GameError> {
        match event {
            InputEvent::PointerMoved { y } => {
                self.gesture.track(y);
                Ok(InputOutcome::Tracked)
            }
            InputEvent::PointerReleased => self.release(world, prefabs),
            InputEvent::RetryConfirmed => self.retry(world, prefabs),
        }
    }

    /// Per-frame bookkeeping after physics stepped; `true` on the frame the throw settles
    pub fn update(&mut self, delta_time: f32, world: &GameWorld) -> bool {
        if self.state != RoundState::Resolving {
            return false;
        }

        let in_play: Vec<NodeId> = self
            .slots
            .iter()
            .filter_map(|slot| world.find(&slot.name))
            .chain(self.thrown)
            .collect();
        if !self.settle.update(delta_time, world.peak_motion(&in_play)) {
            return false;
        }

        self.state = RoundState::AwaitingRetry;
        log::info!("Throw settled after {:.2}s", self.settle.elapsed());
        true
    }

    fn release(&mut self, world: &mut GameWorld, prefabs: &Prefabs) -> Result<InputOutcome, GameError> {
        let power = self.gesture.power();
        if power < self.launch.min_power {
            log::debug!("Ignoring release: power {power:.1} below {}", self.launch.min_power);
            return Ok(InputOutcome::Rejected(Rejection::BelowThreshold { power }));
        }

        let preview = match self.preview {
            Preview::InScene(node) if self.state == RoundState::Idle => node,
            _ => {
                log::debug!("Ignoring release: ball already thrown ({:?})", self.state);
                return Ok(InputOutcome::Rejected(Rejection::BallInFlight));
            }
        };

        self.state = RoundState::Launching;
        if let Err(e) = self.launch_from(preview, power, world, prefabs) {
            self.state = RoundState::Idle;
            log::warn!("Launch failed, back to idle: {e}");
            return Err(e);
        }
        self.state = RoundState::Resolving;
        Ok(InputOutcome::Launched { power })
    }

    fn launch_from(
        &mut self,
        preview: NodeId,
        power: f32,
        world: &mut GameWorld,
        prefabs: &Prefabs,
    ) -> Result<(), GameError> {
        let preview = world
            .scene_mut()
            .remove_node(preview)
            .ok_or_else(|| GameError::missing(&prefabs.ball.model.name))?;
        let start = Transform::from_position(preview.transform.position);
        self.preview = Preview::Stashed(preview);

        let ball = world.spawn_body(THROWN_BALL, prefabs.ball.model.clone(), &prefabs.ball.body_at(start));
        let force = self.launch.force(power);
        if let Err(e) = world.apply_force(ball, force, self.launch.offset()) {
            world.despawn(ball);
            self.restore_preview(world);
            return Err(e.into());
        }

        self.thrown = Some(ball);
        self.settle.reset();
        log::info!(
            "Launched ball from x = {:.2} with power {power:.1} (force {:.1} N)",
            start.position.x,
            force.z
        );
        Ok(())
    }

    fn retry(&mut self, world: &mut GameWorld, prefabs: &Prefabs) -> Result<InputOutcome, GameError> {
        if self.state != RoundState::AwaitingRetry {
            log::debug!("Ignoring retry while {:?}", self.state);
            return Ok(InputOutcome::Rejected(Rejection::NotAwaitingRetry));
        }

        let report = self.clear_fallen_pins(world, prefabs);

        if let Some(ball) = self.thrown.take() {
            if self.clear_thrown_ball_on_retry {
                world.despawn(ball);
            } else {
                self.spent_balls.push(ball);
            }
        }
        self.restore_preview(world);

        self.state = RoundState::Idle;
        log::info!(
            "Retry: {} of {} pins down{}",
            report.pins_fallen,
            report.pins_present,
            if report.rack_reset { ", new rack" } else { "" }
        );
        Ok(InputOutcome::Retried(report))
    }

    fn restore_preview(&mut self, world: &mut GameWorld) {
        if let Preview::Stashed(node) = &self.preview {
            self.preview = Preview::InScene(world.add_visual(node.clone()));
        }
    }

    fn clear_fallen_pins(&mut self, world: &mut GameWorld, prefabs: &Prefabs) -> RetryReport {
        let mut pins_present = 0;
        let mut pins_fallen = 0;
        for slot in &self.slots {
            let Some(pin) = world.find(&slot.name) else {
                continue;
            };
            pins_present += 1;
            if world
                .position(pin)
                .is_some_and(|position| position.y < self.pins.fallen_height)
            {
                pins_fallen += 1;
                world.despawn(pin);
            }
        }

        // Pins cleared on earlier retries are not counted as present, so a rack
        // knocked down over several throws still resets
        self.down_this_rack += pins_fallen;
        let down_this_rack = self.down_this_rack;
        let rack_reset = pins_fallen == pins_present;
        if rack_reset {
            self.rack_pins(world, prefabs);
        }

        RetryReport {
            pins_present,
            pins_fallen,
            rack_reset,
            down_this_rack,
        }
    }
}
