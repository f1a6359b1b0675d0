//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a game with the engine's frame loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Build the scene and the physics
    /// world here; an error stops the engine before anything is simulated.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame, after the queued events have been handled.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Handle application events
    ///
    /// Called between frames, never while an update is running.
    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        // Default implementation forwards to engine
        engine.handle_event(&event);
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once when the loop ends, whether it was stopped or ran out of
    /// frames.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}

/// Application events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Pointer moved while held
    PointerMoved {
        /// Horizontal coordinate in pixels
        x: f32,
        /// Vertical coordinate in pixels, growing downwards
        y: f32,
    },

    /// Pointer released
    PointerReleased,

    /// The player confirmed a retry
    RetryConfirmed,

    /// Shutdown requested
    CloseRequested,
}
