//! Game error types

use lane_engine::config::ConfigError;
use lane_engine::physics::PhysicsError;
use lane_engine::AppError;
use thiserror::Error;

/// Errors that stop a session from being built or from running
///
/// Rejected input and bodies missing a pose for one frame are not errors;
/// they come back as values from the calls that hit them.
#[derive(Debug, Error)]
pub enum GameError {
    /// A required named node is missing from the assets
    #[error("Required asset node '{name}' not found")]
    Construction {
        /// Name that was looked up
        name: String,
    },

    /// Physics failure, including hulls that cannot be built
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration failure
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Asset file could not be read or parsed
    #[error("Asset error: {0}")]
    Asset(String),
}

impl GameError {
    /// Missing node error for `name`
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Construction { name: name.into() }
    }
}

impl From<GameError> for AppError {
    fn from(error: GameError) -> Self {
        match error {
            GameError::Construction { .. } | GameError::Asset(_) => Self::Asset(error.to_string()),
            GameError::Config(_) => Self::Config(error.to_string()),
            GameError::Physics(_) => Self::GameLogic(error.to_string()),
        }
    }
}
