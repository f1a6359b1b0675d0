//! Cosmetic tweens: the preview ball's sway and the camera dolly
//!
//! Nothing here touches physics. Values are pure functions of elapsed time, so
//! a long frame jumps ahead instead of drifting.

use lane_engine::foundation::math::utils::{clamp, lerp};

/// Easing curves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant speed
    #[default]
    Linear,
    /// Cubic, decelerating
    Power2Out,
    /// Cubic, accelerating then decelerating
    Power2InOut,
}

impl Ease {
    /// Map linear progress in `[0, 1]` to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = clamp(t, 0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Scalar tween from one value to another
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    delay: f32,
    duration: f32,
    ease: Ease,
    yoyo: bool,
    // Extra plays after the first; `None` repeats forever
    repeat: Option<u32>,
    elapsed: f32,
}

impl Tween {
    /// Play once from `from` to `to` over `duration` seconds
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            delay: 0.0,
            duration: duration.max(0.0),
            ease: Ease::Linear,
            yoyo: false,
            repeat: Some(0),
            elapsed: 0.0,
        }
    }

    /// Wait `delay` seconds before starting
    #[must_use]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Use an easing curve
    #[must_use]
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Play every other repetition backwards
    #[must_use]
    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    /// Repeat forever
    #[must_use]
    pub fn repeat_forever(mut self) -> Self {
        self.repeat = None;
        self
    }

    /// Advance by `delta_time` and return the new value
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        self.elapsed += delta_time.max(0.0);
        self.value()
    }

    /// Value at the current time
    pub fn value(&self) -> f32 {
        let t = self.elapsed - self.delay;
        if t <= 0.0 {
            return self.from;
        }
        if self.is_finished() || self.duration == 0.0 {
            return self.final_value();
        }

        let cycle = (t / self.duration).floor();
        let mut progress = (t - cycle * self.duration) / self.duration;
        if self.yoyo && cycle % 2.0 == 1.0 {
            progress = 1.0 - progress;
        }
        lerp(self.from, self.to, self.ease.apply(progress))
    }

    /// Whether every repetition has played
    pub fn is_finished(&self) -> bool {
        self.repeat.is_some_and(|repeat| {
            self.elapsed - self.delay >= self.duration * (repeat + 1) as f32
        })
    }

    fn final_value(&self) -> f32 {
        let plays = self.repeat.map_or(1, |repeat| repeat + 1);
        if self.yoyo && plays % 2 == 0 {
            self.from
        } else {
            self.to
        }
    }
}

/// Camera position along the lane, moved by one tween at a time
#[derive(Debug, Clone)]
pub struct CameraRig {
    z: f32,
    dolly: Option<Tween>,
}

impl CameraRig {
    /// Camera resting at `z`
    pub fn new(z: f32) -> Self {
        Self { z, dolly: None }
    }

    /// Current z, for whoever draws the scene
    pub fn z(&self) -> f32 {
        self.z
    }

    /// Whether a dolly is in progress
    pub fn is_moving(&self) -> bool {
        self.dolly.is_some()
    }

    /// Ease from the current z to `target`, replacing any dolly in progress
    pub fn dolly_to(&mut self, target: f32, delay: f32, duration: f32) {
        self.dolly = Some(
            Tween::new(self.z, target, duration)
                .with_delay(delay)
                .with_ease(Ease::Power2Out),
        );
    }

    /// Advance the dolly; `true` on the frame it arrives
    pub fn update(&mut self, delta_time: f32) -> bool {
        let Some(dolly) = &mut self.dolly else {
            return false;
        };
        self.z = dolly.advance(delta_time);
        if dolly.is_finished() {
            self.dolly = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ease_end_points() {
        for ease in [Ease::Linear, Ease::Power2Out, Ease::Power2InOut] {
            assert_relative_eq!(ease.apply(0.0), 0.0);
            assert_relative_eq!(ease.apply(1.0), 1.0);
        }
        assert_relative_eq!(Ease::Power2InOut.apply(0.5), 0.5);
        assert_relative_eq!(Ease::Power2Out.apply(0.5), 0.875);
    }

    #[test]
    fn test_delay_holds_the_start_value() {
        let mut tween = Tween::new(-3.0, 1.0, 3.0).with_delay(1.5);
        assert_relative_eq!(tween.advance(1.0), -3.0);
        assert_relative_eq!(tween.advance(0.5), -3.0);
        assert_relative_eq!(tween.advance(1.5), -1.0);
        assert_relative_eq!(tween.advance(1.5), 1.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_sway_yoyos_forever() {
        let mut sway = Tween::new(0.5, -0.5, 1.5)
            .with_ease(Ease::Power2InOut)
            .yoyo()
            .repeat_forever();

        assert_relative_eq!(sway.value(), 0.5);
        assert_relative_eq!(sway.advance(0.75), 0.0, epsilon = 1e-6);
        assert_relative_eq!(sway.advance(0.75), -0.5, epsilon = 1e-6);
        assert_relative_eq!(sway.advance(1.5), 0.5, epsilon = 1e-6);
        sway.advance(1000.0);
        assert!(!sway.is_finished());
        assert!(sway.value().abs() <= 0.5);
    }

    #[test]
    fn test_camera_dolly_arrives_once() {
        let mut camera = CameraRig::new(-3.0);
        camera.dolly_to(1.0, 1.5, 3.0);

        assert!(!camera.update(1.5));
        assert_relative_eq!(camera.z(), -3.0);
        assert!(!camera.update(1.5));
        assert!(camera.z() > -1.0);
        assert!(camera.update(1.5));
        assert_relative_eq!(camera.z(), 1.0);
        assert!(!camera.is_moving());
        assert!(!camera.update(1.0));
    }

    #[test]
    fn test_camera_dolly_starts_from_current_position() {
        let mut camera = CameraRig::new(-3.0);
        camera.dolly_to(1.0, 0.0, 2.0);
        camera.update(1.0);
        let midway = camera.z();

        camera.dolly_to(-3.1, 0.0, 1.0);
        assert!(!camera.update(0.0));
        assert_relative_eq!(camera.z(), midway);
        camera.update(1.0);
        assert_relative_eq!(camera.z(), -3.1);
    }
}
