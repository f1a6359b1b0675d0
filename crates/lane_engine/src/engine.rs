//! Core engine implementation

use std::collections::VecDeque;

use crate::{
    application::{AppEvent, Application},
    foundation::time::Timer,
};
use thiserror::Error;

/// Main engine struct
///
/// The engine owns the frame loop: it drains queued events, then asks the
/// application to update, once per frame, on a single thread.
pub struct Engine {
    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Events waiting for the next frame
    events: VecDeque<AppEvent>,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if let Some(delta) = config.fixed_delta {
            if !delta.is_finite() || delta < 0.0 {
                return Err(EngineError::ConfigError(format!(
                    "fixed delta must be a non-negative number of seconds, got {delta}"
                )));
            }
        }
        log::info!("Initializing engine...");

        Ok(Self {
            timer: Timer::new(),
            config,
            events: VecDeque::new(),
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");

        let result = engine.main_loop(app);

        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete after {} frames ({:.2}s simulated)",
            engine.frame_count(),
            engine.elapsed()
        );
        result
    }

    fn main_loop<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        while self.running {
            if self
                .config
                .max_frames
                .is_some_and(|max| self.timer.frame_count() >= max)
            {
                log::debug!("Frame limit reached");
                break;
            }

            while let Some(event) = self.events.pop_front() {
                app.handle_event(self, event)
                    .map_err(|e| EngineError::ApplicationError(format!("App event: {e}")))?;
            }
            if !self.running {
                break;
            }

            let delta_time = match self.config.fixed_delta {
                Some(delta) => self.timer.advance(delta),
                None => self.timer.tick(),
            };

            app.update(self, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;
        }
        Ok(())
    }

    /// Default handling for events the application does not consume
    pub fn handle_event(&mut self, event: &AppEvent) {
        if matches!(event, AppEvent::CloseRequested) {
            self.quit();
        }
    }

    /// Queue an event for delivery before the next update
    pub fn queue_event(&mut self, event: AppEvent) {
        self.events.push_back(event);
    }

    /// Number of events waiting for delivery
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Number of frames updated so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Seconds of frame time handed to the application so far
    pub fn elapsed(&self) -> f32 {
        self.timer.total_time()
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Use this delta every frame instead of wall-clock time
    pub fixed_delta: Option<f32>,

    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

impl EngineConfig {
    /// Headless configuration: fixed step, bounded run
    pub fn headless(fixed_delta: f32, max_frames: u64) -> Self {
        Self {
            fixed_delta: Some(fixed_delta),
            max_frames: Some(max_frames),
        }
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Recorder {
        initialized: bool,
        cleaned_up: bool,
        updates: Vec<f32>,
        events: Vec<(u64, AppEvent)>,
        fail_on_frame: Option<u64>,
    }

    impl Application for Recorder {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            self.initialized = true;
            engine.queue_event(AppEvent::PointerMoved { x: 0.0, y: 10.0 });
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
            self.updates.push(delta_time);
            if self.fail_on_frame == Some(engine.frame_count()) {
                return Err(AppError::GameLogic("boom".to_string()));
            }
            if engine.frame_count() == 2 {
                engine.queue_event(AppEvent::PointerReleased);
            }
            Ok(())
        }

        fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
            self.events.push((engine.frame_count(), event));
            engine.handle_event(&event);
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    #[test]
    fn test_fixed_delta_runs_bounded_frames() {
        let mut app = Recorder::default();
        Engine::run(EngineConfig::headless(0.5, 4), &mut app).unwrap();

        assert!(app.initialized);
        assert!(app.cleaned_up);
        assert_eq!(app.updates.len(), 4);
        for delta in &app.updates {
            assert_relative_eq!(*delta, 0.5);
        }
    }

    #[test]
    fn test_events_are_delivered_before_the_next_update() {
        let mut app = Recorder::default();
        Engine::run(EngineConfig::headless(1.0 / 60.0, 5), &mut app).unwrap();

        assert_eq!(
            app.events,
            vec![
                (0, AppEvent::PointerMoved { x: 0.0, y: 10.0 }),
                (2, AppEvent::PointerReleased),
            ]
        );
    }

    #[test]
    fn test_close_request_stops_the_loop() {
        struct Closer(u32);
        impl Application for Closer {
            fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
                engine.queue_event(AppEvent::CloseRequested);
                Ok(())
            }
            fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
                self.0 += 1;
                Ok(())
            }
            fn cleanup(&mut self, _engine: &mut Engine) {}
        }

        let mut app = Closer(0);
        Engine::run(EngineConfig::headless(0.1, 100), &mut app).unwrap();
        assert_eq!(app.0, 0);
    }

    #[test]
    fn test_update_error_still_cleans_up() {
        let mut app = Recorder {
            fail_on_frame: Some(1),
            ..Recorder::default()
        };
        let result = Engine::run(EngineConfig::headless(0.1, 10), &mut app);

        assert!(matches!(result, Err(EngineError::ApplicationError(_))));
        assert!(app.cleaned_up);
        assert_eq!(app.updates.len(), 1);
    }

    #[test]
    fn test_negative_fixed_delta_is_rejected() {
        assert!(matches!(
            Engine::new(EngineConfig::headless(-1.0, 1)),
            Err(EngineError::ConfigError(_))
        ));
    }
}
