//! Headless bowling session
//!
//! Plays a scripted series of throws on the built-in lane (or on the RON asset
//! manifest given as the first argument) and logs each result. Settings come
//! from `bowling.toml` when present.

use std::collections::VecDeque;

use bowling::{AssetLibrary, GameConfig, GameError, InputEvent, InputOutcome, RoundState, Session};
use lane_engine::config::Config;
use lane_engine::foundation::logging;
use lane_engine::{AppError, AppEvent, Application, Engine, EngineConfig};

const CONFIG_PATH: &str = "bowling.toml";
const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FRAMES: u64 = 60 * 120;

/// Pointer height where every scripted drag starts
const DRAG_START_Y: f32 = 600.0;

struct BowlingApp {
    config: GameConfig,
    assets: AssetLibrary,
    session: Option<Session>,
    // Drag lengths in pixels, one per throw
    throws: VecDeque<f32>,
}

impl BowlingApp {
    fn new(config: GameConfig, assets: AssetLibrary, throws: impl IntoIterator<Item = f32>) -> Self {
        Self {
            config,
            assets,
            session: None,
            throws: throws.into_iter().collect(),
        }
    }

    fn session(&mut self) -> Result<&mut Session, AppError> {
        self.session
            .as_mut()
            .ok_or_else(|| AppError::Custom("session not initialized".to_string()))
    }

    /// Queue the next scripted input once the previous one has been handled
    fn script(&mut self, engine: &mut Engine, state: RoundState) {
        if engine.pending_events() > 0 {
            return;
        }
        match state {
            RoundState::Idle => match self.throws.pop_front() {
                Some(drag) => {
                    engine.queue_event(AppEvent::PointerMoved { x: 0.0, y: DRAG_START_Y });
                    engine.queue_event(AppEvent::PointerMoved { x: 0.0, y: DRAG_START_Y - drag });
                    engine.queue_event(AppEvent::PointerReleased);
                }
                None => engine.queue_event(AppEvent::CloseRequested),
            },
            RoundState::AwaitingRetry => engine.queue_event(AppEvent::RetryConfirmed),
            RoundState::Launching | RoundState::Resolving => {}
        }
    }
}

impl Application for BowlingApp {
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        self.session = Some(Session::new(self.config.clone(), &self.assets)?);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        let session = self.session()?;
        session.update(delta_time);
        let state = session.state();
        self.script(engine, state);
        Ok(())
    }

    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        let Some(input) = InputEvent::from_app_event(&event) else {
            engine.handle_event(&event);
            return Ok(());
        };

        match self.session()?.handle_input(input)? {
            InputOutcome::Launched { power } => log::info!("Throw with power {power:.0}"),
            InputOutcome::Retried(report) => log::info!("{report:?}"),
            InputOutcome::Rejected(rejection) => log::debug!("Input rejected: {rejection:?}"),
            InputOutcome::Tracked => {}
        }
        Ok(())
    }

    fn cleanup(&mut self, _engine: &mut Engine) {
        if let Some(session) = &self.session {
            log::info!(
                "Session over in state {:?}, camera at z = {:.2}",
                session.state(),
                session.camera_z()
            );
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = GameConfig::load_or_default(CONFIG_PATH).map_err(GameError::from)?;
    let assets = match std::env::args().nth(1) {
        Some(path) => AssetLibrary::load_ron(path)?,
        None => AssetLibrary::builtin(),
    };

    let mut app = BowlingApp::new(config, assets, [60.0, 45.0, 90.0]);
    Engine::run(EngineConfig::headless(FRAME_TIME, MAX_FRAMES), &mut app)?;
    Ok(())
}

fn main() {
    logging::init("info");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
