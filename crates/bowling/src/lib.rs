//! # Bowling
//!
//! A single-lane bowling toy on top of `lane_engine`: drag to throw, watch
//! the pins fly, retry once everything has settled.
//!
//! [`Session`] is the entry point. It owns the scene, the physics world and
//! the [`Round`](round::Round) state machine; a frame driver feeds it input
//! and elapsed time.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod error;
pub mod input;
pub mod prefabs;
pub mod round;
pub mod session;
pub mod settle;
pub mod tween;
pub mod world;


pub use assets::{AssetLibrary, AssetSource};
pub use config::GameConfig;
pub use error::GameError;
pub use input::InputEvent;
pub use round::{InputOutcome, Rejection, RetryReport, RoundState};
pub use session::Session;
