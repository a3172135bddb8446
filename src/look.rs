//! Mouse look and head bob.

use glam::{Vec2, Vec3};

use crate::config::{HeadBobConfig, LookConfig};

/// Yaw and pitch of the first-person camera, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct LookController {
    yaw: f32,
    pitch: f32,
    sensitivity: f32,
    pitch_clamp: f32,
}

impl LookController {
    /// Level look facing down `-Z`.
    #[must_use]
    pub fn new(config: &LookConfig) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: config.sensitivity,
            pitch_clamp: config.pitch_clamp_degrees.abs(),
        }
    }

    /// Applies a look delta. Positive `y` looks up.
    pub fn apply(&mut self, delta: Vec2) {
        self.yaw = (self.yaw + delta.x * self.sensitivity).rem_euclid(360.0);
        self.pitch = (self.pitch - delta.y * self.sensitivity).clamp(-self.pitch_clamp, self.pitch_clamp);
    }

    /// Yaw in radians.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees; negative looks up.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Facing direction on the ground plane (`-Z` at zero yaw).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.sin(), 0.0, -yaw.cos())
    }

    /// Strafe direction on the ground plane.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Direction the reticle points, including pitch.
    #[must_use]
    pub fn eye_forward(&self) -> Vec3 {
        let pitch = -self.pitch.to_radians();
        (self.forward() * pitch.cos() + Vec3::Y * pitch.sin()).normalize_or_zero()
    }

    /// World-space movement direction for a strafe/forward axis pair.
    #[must_use]
    pub fn planar_direction(&self, axis: Vec2) -> Vec3 {
        self.right() * axis.x + self.forward() * axis.y
    }
}

/// Camera bob while walking, easing back to rest when idle.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadBob {
    config: HeadBobConfig,
    timer: f32,
    offset: Vec3,
}

impl HeadBob {
    /// Bob at rest.
    #[must_use]
    pub const fn new(config: HeadBobConfig) -> Self {
        Self {
            config,
            timer: 0.0,
            offset: Vec3::ZERO,
        }
    }

    /// Updates the bob offset. Airborne ticks freeze the current offset.
    pub fn update(&mut self, dt: f32, grounded: bool, moving: bool, running: bool) -> Vec3 {
        if !self.config.enabled || !grounded {
            return self.offset;
        }

        if moving {
            self.timer += dt * self.config.frequency;
            let amplitude = if running {
                self.config.amplitude_running
            } else {
                self.config.amplitude
            };
            self.offset = Vec3::new(
                self.timer.sin() * amplitude * 0.5,
                (self.timer * 2.0).sin() * amplitude,
                0.0,
            );
        } else {
            self.timer = 0.0;
            let blend = 1.0 - (-self.config.return_rate * dt).exp();
            self.offset = self.offset.lerp(Vec3::ZERO, blend);
        }
        self.offset
    }

    /// Current camera offset.
    #[must_use]
    pub const fn offset(&self) -> Vec3 {
        self.offset
    }
}
