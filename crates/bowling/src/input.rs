//! Player input and drag gesture tracking

use lane_engine::AppEvent;

/// Input the round reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to vertical coordinate `y` (pixels, growing downwards)
    PointerMoved {
        /// Vertical coordinate
        y: f32,
    },
    /// Pointer released: a throw attempt
    PointerReleased,
    /// The player confirmed a retry
    RetryConfirmed,
}

impl InputEvent {
    /// Translate a frame-loop event; `None` for events the round ignores
    pub fn from_app_event(event: &AppEvent) -> Option<Self> {
        match *event {
            AppEvent::PointerMoved { y, .. } => Some(Self::PointerMoved { y }),
            AppEvent::PointerReleased => Some(Self::PointerReleased),
            AppEvent::RetryConfirmed => Some(Self::RetryConfirmed),
            AppEvent::CloseRequested => None,
        }
    }
}

/// Last two pointer heights
///
/// Power is the distance covered by the final move before release, upwards
/// positive. Nothing is reset on release: a second release without moving
/// reports the same power again.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragGesture {
    previous_y: f32,
    current_y: f32,
}

impl DragGesture {
    /// Record a pointer move
    pub fn track(&mut self, y: f32) {
        self.previous_y = self.current_y;
        self.current_y = y;
    }

    /// Drag power at release
    pub fn power(&self) -> f32 {
        self.previous_y - self.current_y
    }
}
